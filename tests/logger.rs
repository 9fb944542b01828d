use chrono::DateTime;
use fieldlog::{
    fields, Config, Fields, Level, Logger, MemorySink, TextFormatter, Value, WriterSink,
};
use similar_asserts::assert_eq;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;

fn capture() -> (Logger, MemorySink, MemorySink) {
    let sink = MemorySink::new();
    let fallback = MemorySink::new();
    let logger = Config::default()
        .with_sink(sink.clone())
        .with_fallback(fallback.clone())
        .build();
    (logger, sink, fallback)
}

fn parse(line: &str) -> serde_json::Map<String, serde_json::Value> {
    match serde_json::from_str(line).unwrap() {
        serde_json::Value::Object(map) => map,
        other => panic!("not a JSON object: {}", other),
    }
}

#[test]
fn hostname_scenario() {
    let (logger, sink, fallback) = capture();
    logger.with(fields! { "hostname" => "staging-1" }).info("ready");

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(r#"{"level":"info","time":""#));
    assert!(lines[0].ends_with(r#"Z","msg":"ready","hostname":"staging-1"}"#));
    let line = parse(&lines[0]);
    assert_eq!(line["level"], "info");
    assert_eq!(line["msg"], "ready");
    assert_eq!(line["hostname"], "staging-1");
    let time = line["time"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(time).is_ok());
    assert!(time.ends_with('Z'));
    assert!(fallback.contents().is_empty());
}

#[test]
fn output_is_newline_terminated() {
    let (logger, sink, _) = capture();
    logger.warn("one");
    logger.error("two");
    let contents = String::from_utf8(sink.contents()).unwrap();
    assert!(contents.ends_with('\n'));
    assert_eq!(contents.matches('\n').count(), 2);
}

#[test]
fn chained_with_equals_merge() {
    let cases: Vec<(Fields, Fields)> = vec![
        (fields! {}, fields! {}),
        (fields! { "a" => 1 }, fields! {}),
        (fields! {}, fields! { "a" => 1 }),
        (fields! { "a" => 1, "b" => "x" }, fields! { "b" => "y", "c" => true }),
        (fields! { "a" => 1.5, "b" => 2 }, fields! { "b" => 3, "a" => false }),
    ];
    let (root, _, _) = capture();
    for (f1, f2) in cases {
        let chained = root.with(f1.clone()).with(f2.clone());
        assert_eq!(chained.context(), &f1.merged(&f2));
        for (key, value) in f2.iter() {
            assert_eq!(chained.context().get(key), Some(value));
        }
    }
}

#[test]
fn with_empty_is_identity() {
    let (root, _, _) = capture();
    let logger = root.with(fields! { "appname" => "foo-app", "session" => "1ce3f6v" });
    assert_eq!(logger.with(Fields::new()).context(), logger.context());
}

#[test]
fn json_round_trip() {
    let (logger, sink, _) = capture();
    let fields = fields! {
        "string" => "foo",
        "int" => 1,
        "negative" => -42i64,
        "float" => 1.1,
        "bool" => true,
        "quoted" => "a \"b\"\n\tc",
    };
    logger.error_with("My first event from golang to stdout", fields.clone());

    let line = parse(&sink.lines()[0]);
    assert_eq!(line["level"], "error");
    assert_eq!(line["msg"], "My first event from golang to stdout");
    let recovered: Fields = line
        .into_iter()
        .filter(|(k, _)| !matches!(k.as_str(), "level" | "time" | "msg"))
        .map(|(k, v)| (k, Value::from(v)))
        .collect();
    assert_eq!(recovered.len(), fields.len());
    for (key, value) in fields.iter() {
        assert_eq!(recovered.get(key), Some(value), "field {}", key);
    }
}

#[test]
fn nested_value_does_not_crash() {
    let (logger, sink, fallback) = capture();
    logger.info_with(
        "with nested",
        fields! { "user" => serde_json::json!({"id": 7, "roles": ["admin"]}), "ok" => 1 },
    );

    let diagnostics = fallback.lines();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].starts_with("fieldlog: error encoding log record"));

    let line = parse(&sink.lines()[0]);
    assert_eq!(line["user"], r#"{"id":7,"roles":["admin"]}"#);
    assert_eq!(line["ok"], 1);
}

#[test]
fn non_finite_float_is_stringified() {
    let (logger, sink, fallback) = capture();
    logger.info_with("ratio", fields! { "r" => f64::NEG_INFINITY });
    assert!(fallback.lines()[0].contains("non-finite float"));
    assert_eq!(parse(&sink.lines()[0])["r"], "-inf");
}

#[test]
fn reserved_keys_move_under_fields_prefix() {
    let (logger, sink, fallback) = capture();
    logger.info_with("real", fields! { "level" => "fake", "time" => 0, "msg" => "fake" });

    assert_eq!(fallback.lines().len(), 1);
    let line = parse(&sink.lines()[0]);
    assert_eq!(line["level"], "info");
    assert_eq!(line["msg"], "real");
    assert_eq!(line["fields.level"], "fake");
    assert_eq!(line["fields.time"], 0);
    assert_eq!(line["fields.msg"], "fake");
}

#[test]
fn debug_is_filtered_by_default() {
    let (logger, sink, _) = capture();
    logger.debug("hidden");
    logger.trace("hidden");
    assert!(sink.lines().is_empty());
    logger.set_level(Level::Debug);
    logger.debug("shown");
    assert_eq!(sink.lines().len(), 1);
}

const THREADS: usize = 8;
const LINES: usize = 200;

/// Log from several threads at once and return everything written.
fn log_concurrently(root: Logger, contents: impl Fn() -> Vec<u8>) -> String {
    let root = Arc::new(root);
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let root = Arc::clone(&root);
            thread::spawn(move || {
                let logger = root.with(fields! { "thread" => t });
                for i in 0..LINES {
                    logger.info_with("tick", fields! { "i" => i, "pad" => "x".repeat(64) });
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    String::from_utf8(contents()).unwrap()
}

fn assert_whole_lines(contents: &str) {
    assert!(contents.ends_with('\n'));
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), THREADS * LINES);

    let mut seen = vec![0usize; THREADS];
    for line in lines {
        let line = parse(line);
        assert_eq!(line["msg"], "tick");
        seen[line["thread"].as_u64().unwrap() as usize] += 1;
    }
    assert_eq!(seen, vec![LINES; THREADS]);
}

#[test]
fn concurrent_lines_are_not_interleaved() {
    let (root, sink, fallback) = capture();
    let contents = log_concurrently(root, || sink.contents());
    assert_whole_lines(&contents);
    assert!(fallback.contents().is_empty());
}

/// Writer that accepts at most a few bytes per call, so a line takes many
/// `write` calls and unserialized writers would interleave.
#[derive(Clone, Default)]
struct TrickleWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for TrickleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(7);
        self.buffer.lock().unwrap().extend_from_slice(&buf[..n]);
        thread::yield_now();
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn concurrent_lines_through_writer_sink() {
    let writer = TrickleWriter::default();
    let fallback = MemorySink::new();
    let root = Config::default()
        .with_sink(WriterSink::new(writer.clone()))
        .with_fallback(fallback.clone())
        .build();

    let contents = log_concurrently(root, || writer.buffer.lock().unwrap().clone());
    assert_whole_lines(&contents);
    assert!(fallback.contents().is_empty());
}

#[test]
fn shadowed_reserved_field_is_kept() {
    let (logger, sink, fallback) = capture();
    logger.info_with("real", fields! { "msg" => "shadow", "fields.msg" => "other" });

    assert_eq!(fallback.lines().len(), 1);
    let line = parse(&sink.lines()[0]);
    assert_eq!(line["msg"], "real");
    assert_eq!(line["fields.msg"], "other");
    assert_eq!(line["fields.fields.msg"], "shadow");
}

#[test]
fn text_output_keeps_one_line_per_record() {
    let (logger, sink, _) = capture();
    logger.set_formatter(TextFormatter::new().with_disable_timestamp(true));
    logger.info_with("ready", fields! { "evil\nlevel" => "error", "a b=c" => 1 });

    let contents = String::from_utf8(sink.contents()).unwrap();
    assert_eq!(contents, "level=info msg=ready evil_level=error a_b_c=1\n");
}
