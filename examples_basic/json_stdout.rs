use fieldlog::{fields, Config, FormatKind};

fn main() {
    let log = Config::default().with_format(FormatKind::Json).build();

    log.info_with(
        "My first event to stdout",
        fields! { "string" => "foo", "int" => 1, "float" => 1.1 },
    );

    // Re-use fields between log statements with a contextual logger.
    let contextualized = log.with(fields! {
        "hostname" => "staging-1",
        "appname" => "foo-app",
        "session" => "1ce3f6v",
    });

    contextualized.info("Simple event with global metadata");
    log.flush();
}
