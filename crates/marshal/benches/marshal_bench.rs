use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use http::Request;
use micro_marshal::marshal::{Marshaller, StreamingRequestMarshaller, marshaller_fn};
use micro_marshal::protocol::MarshalError;
use micro_marshal::protocol::body::{AsyncRequestBody, RequestBody};
use micro_marshal::transfer::{TransferConfiguration, decide};

struct PutObject {
    key: &'static str,
}

fn put_object(input: &PutObject) -> Result<Request<()>, MarshalError> {
    Request::put(format!("/bucket/{}", input.key))
        .header(http::header::HOST, "bucket.example.com")
        .header("x-amz-meta-owner", "bench")
        .body(())
        .map_err(MarshalError::delegate)
}

fn bench_decide(c: &mut Criterion) {
    c.bench_function("decide_known_length", |b| {
        b.iter(|| black_box(decide(black_box(Some(500)), false, false, false)));
    });

    c.bench_function("decide_chunked", |b| {
        b.iter(|| black_box(decide(black_box(None), true, true, false)));
    });
}

fn bench_marshal(c: &mut Criterion) {
    let configs = [
        ("length", TransferConfiguration::default()),
        ("chunked", TransferConfiguration::default().with_chunked_unsigned_encoding(true)),
        ("http2", TransferConfiguration::default().with_http2(true)),
    ];
    let input = PutObject { key: "photo.png" };

    let mut group = c.benchmark_group("streaming_marshal");
    for (name, config) in configs {
        let sync = StreamingRequestMarshaller::builder()
            .delegate_marshaller(marshaller_fn(put_object))
            .request_body(RequestBody::from_bytes(vec![0u8; 1024]))
            .transfer_configuration(config)
            .build()
            .expect("sync marshaller should build");

        let async_ = StreamingRequestMarshaller::async_builder()
            .delegate_marshaller(marshaller_fn(put_object))
            .async_request_body(AsyncRequestBody::from_bytes(vec![0u8; 1024]))
            .transfer_configuration(config)
            .build()
            .expect("async marshaller should build");

        group.bench_with_input(BenchmarkId::new("sync", name), &input, |b, input| {
            b.iter(|| black_box(sync.marshal(input).expect("request should marshal")));
        });
        group.bench_with_input(BenchmarkId::new("async", name), &input, |b, input| {
            b.iter(|| black_box(async_.marshal(input).expect("request should marshal")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decide, bench_marshal);
criterion_main!(benches);
