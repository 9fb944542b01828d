use std::time::Instant;

use fieldlog::channel::ChannelSink;
use fieldlog::{fields, Config};

#[tokio::main]
async fn main() {
    let (sink, handle) = ChannelSink::new(tokio::io::sink(), 50_000);
    let stats = sink.stats();
    let log = Config::default().with_sink(sink).build();

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        log.error_with("channel load test error", fields! { "iteration" => i });
    }

    let elapsed = start.elapsed();
    println!("channel sink: sent {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    // Dropping the logger closes the channel; wait for the writer to drain it.
    drop(log);
    if handle.await.is_ok() {
        println!(
            "enqueued {}, dropped {}, written {}",
            stats.enqueued(),
            stats.dropped(),
            stats.written()
        );
    }
}
