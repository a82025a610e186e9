// File registry benchmarks.
//
// Covers registration throughput and page cost at increasing registry sizes.
// A page should cost the same whether it is the first or the last one.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use doctorium_filehash::keys::MODULE_NAME;
use doctorium_filehash::query::{encode_cursor, list_files};
use doctorium_filehash::{
    FileHashModule, Msg, MsgUploadFile, PageRequest, Params, QueryFileListRequest,
    MODULE_ACCOUNT_PERMISSIONS,
};
use doctorium_protocol::bank::Bank;
use doctorium_protocol::identity::AccAddress;
use doctorium_protocol::storage::MemStore;

fn module() -> FileHashModule<Bank> {
    let bank = Bank::new().with_module_account(MODULE_NAME, MODULE_ACCOUNT_PERMISSIONS);
    FileHashModule::new(Params::default(), bank)
}

fn seeded_store(module: &FileHashModule<Bank>, size: usize) -> MemStore {
    let creator = AccAddress::from_bytes(vec![1u8; 20]).unwrap().to_bech32();
    let mut store = MemStore::new();
    for i in 0..size {
        let msg = Msg::UploadFile(MsgUploadFile::new(creator.as_str(), format!("{:064x}", i)));
        module.handle_msg(&mut store, &msg).unwrap();
    }
    store
}

fn bench_upload(c: &mut Criterion) {
    let module = module();
    let creator = AccAddress::from_bytes(vec![2u8; 20]).unwrap().to_bech32();

    c.bench_function("filehash/upload_file", |b| {
        let mut store = MemStore::new();
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            let msg = Msg::UploadFile(MsgUploadFile::new(creator.as_str(), format!("{:064x}", n)));
            module.handle_msg(&mut store, &msg).unwrap();
        });
    });
}

fn bench_page_position(c: &mut Criterion) {
    let mut group = c.benchmark_group("filehash/list_files_last_page");
    let module = module();

    for size in [1_000usize, 10_000, 50_000] {
        let store = seeded_store(&module, size);
        let near_end = format!("{:064x}", size - 100);
        let req = QueryFileListRequest {
            pagination: PageRequest::after(encode_cursor(near_end.as_bytes()), 100),
        };

        group.throughput(Throughput::Elements(100));
        group.bench_with_input(BenchmarkId::from_parameter(size), &req, |b, req| {
            b.iter(|| list_files(&store, req).unwrap());
        });
    }

    group.finish();
}

fn bench_first_page(c: &mut Criterion) {
    let module = module();
    let store = seeded_store(&module, 10_000);
    let req = QueryFileListRequest {
        pagination: PageRequest::first(100),
    };

    c.bench_function("filehash/list_files_first_page", |b| {
        b.iter(|| list_files(&store, &req).unwrap());
    });
}

criterion_group!(benches, bench_upload, bench_page_position, bench_first_page);
criterion_main!(benches);
