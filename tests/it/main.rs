mod pm;

use std::fmt::Write;

use argshape::{Command, Grammar, Parsed, Value};
use expect_test::{expect, Expect};

fn check(grammar: &Grammar, args: &str, expect: Expect) {
    let args = args.split_ascii_whitespace();
    match grammar.parse(args) {
        Ok(parsed) => expect.assert_eq(&render(&parsed)),
        Err(err) => expect.assert_eq(&err.to_string()),
    }
}

fn render(parsed: &Parsed) -> String {
    let mut buf = String::new();
    let path = if parsed.path.is_empty() { "<root>".to_string() } else { parsed.path.join(" ") };
    writeln!(buf, "{path}").unwrap();
    for (key, value) in parsed.values.clone().into_map() {
        let value = match value {
            Value::Absent => "-".to_string(),
            Value::Bool(it) => it.to_string(),
            Value::Counter(it) => it.to_string(),
            Value::Int(it) => it.to_string(),
            Value::Str(it) => format!("{it:?}"),
            Value::List(it) => format!("{it:?}"),
        };
        writeln!(buf, "  {key}: {value}").unwrap();
    }
    buf
}

#[test]
fn smoke() {
    let grammar = pm::grammar();
    check(
        &grammar,
        "add --force lodash",
        expect![[r#"
            add
              force: true
              pkg: "lodash"
        "#]],
    );
    check(
        &grammar,
        "install a b c",
        expect![[r#"
            install
              frozen: false
              packages: ["a", "b", "c"]
        "#]],
    );
    check(
        &grammar,
        "",
        expect![[r#"
            <root>
              verbose: 0
              version: false
        "#]],
    );
    check(
        &grammar,
        "-v --version",
        expect![[r#"
            <root>
              verbose: 1
              version: true
        "#]],
    );
}

#[test]
fn options() {
    let grammar = pm::grammar();
    check(
        &grammar,
        "build --foo a --foo b",
        expect![[r#"
            build
              foo: ["a", "b"]
              jobs: -
              mode: -
              verbose: 0
        "#]],
    );
    check(
        &grammar,
        "build -vvv --no-v",
        expect![[r#"
            build
              foo: []
              jobs: -
              mode: -
              verbose: 0
        "#]],
    );
    check(
        &grammar,
        "build -vv --mode=dev -j 4",
        expect![[r#"
            build
              foo: []
              jobs: 4
              mode: "dev"
              verbose: 2
        "#]],
    );
    check(&grammar, "build --mode", expect!["expected a value for `--mode`"]);
    check(
        &grammar,
        "build --mode=fast",
        expect!["Invalid value for `mode`: expected one of `dev`, `prod`, got `fast`"],
    );
    check(
        &grammar,
        "build -j lots",
        expect!["Invalid value for `jobs`: expected an integer, got `lots`"],
    );
    check(
        &grammar,
        "add --force=yes x",
        expect!["Option does not accept a bound value: `--force`"],
    );
}

#[test]
fn positionals() {
    let grammar = pm::grammar();
    check(
        &grammar,
        "remote add origin https://example.com",
        expect![[r#"
            remote add
              name: "origin"
              url: "https://example.com"
        "#]],
    );
    check(
        &grammar,
        "cp x",
        expect![[r#"
            cp
              dst: "x"
              src: -
        "#]],
    );
    check(
        &grammar,
        "cp x y",
        expect![[r#"
            cp
              dst: "y"
              src: "x"
        "#]],
    );
    check(
        &grammar,
        "add -12",
        expect![[r#"
            add
              force: false
              pkg: "-12"
        "#]],
    );
    check(&grammar, "add", expect!["Argument is required: `pkg`. Use `help` for more information"]);
    check(&grammar, "add a b", expect!["Unexpected argument: `b`"]);
}

#[test]
fn proxies() {
    let grammar = pm::grammar();
    check(
        &grammar,
        "exec -- --not-an-option",
        expect![[r#"
            exec
              args: ["--not-an-option"]
        "#]],
    );
    check(
        &grammar,
        "run build --inspect -- x",
        expect![[r#"
            run
              args: ["--inspect", "x"]
              script: "build"
              verbose: 0
        "#]],
    );
    check(
        &grammar,
        "run -v build -v",
        expect![[r#"
            run
              args: ["-v"]
              script: "build"
              verbose: 1
        "#]],
    );
}

#[test]
fn unknown_commands() {
    let grammar = pm::grammar();
    check(&grammar, "buidl", expect!["Unknown command: `buidl`. Did you mean `build`?"]);
    check(&grammar, "remote ad origin url", expect!["Unknown command: `ad`. Did you mean `add`?"]);
    check(
        &grammar,
        "remote --list",
        expect![[r#"
            remote
              list: true
        "#]],
    );

    let mut grammar = Grammar::new();
    grammar.command(Command::new("build")).unwrap();
    check(&grammar, "buidl", expect!["Unknown command: `buidl`. Did you mean `build`?"]);
    check(&grammar, "xyzzy", expect!["Unknown command: `xyzzy`."]);
    check(
        &grammar,
        "",
        expect!["A command is required, one of `build`. Use `help` for more information"],
    );

    let mut grammar = Grammar::new();
    grammar.command(Command::new("remote add")).unwrap();
    grammar.command(Command::new("remote rm")).unwrap();
    check(
        &grammar,
        "remote",
        expect!["A command is required, one of `add`, `rm`. Use `help` for more information"],
    );
}

#[test]
fn equally_specific_commands() {
    let grammar = pm::grammar();
    let all = grammar.parse(["deploy", "--all"]).unwrap();
    let target = grammar.parse(["deploy", "prod"]).unwrap();
    assert!(all.command < target.command);
    assert_eq!(all.path, target.path);
    check(
        &grammar,
        "deploy prod",
        expect![[r#"
            deploy
              target: "prod"
        "#]],
    );
    check(&grammar, "deploy a b", expect!["Unexpected arguments: `a`, `b`"]);
}

#[test]
fn resolved_state_is_exposed() {
    use argshape::resolve::{OptionValue, SlotCategory};

    let grammar = pm::grammar();
    let (command, m) = grammar.resolve(["build", "--foo", "a", "-v"]).unwrap();
    assert_eq!(grammar.registry().get(command).unwrap().path(), ["build"]);
    let names: Vec<&str> = m.options.iter().map(|it| it.name.as_str()).collect();
    assert_eq!(names, ["--foo", "-v"]);
    assert_eq!(m.options[0].value, OptionValue::Values(vec!["a".to_string()]));
    assert!(m.positionals.is_empty());

    let (_, m) = grammar.resolve(["cp", "x", "y"]).unwrap();
    let categories: Vec<SlotCategory> = m.positionals.iter().map(|it| it.category).collect();
    assert_eq!(categories, [SlotCategory::Optional, SlotCategory::Required]);
}

#[test]
fn parses_concurrently() {
    let grammar = pm::grammar();
    std::thread::scope(|s| {
        let a = s.spawn(|| grammar.parse(["install", "a"]).unwrap());
        let b = s.spawn(|| grammar.parse(["add", "b"]).unwrap());
        assert_eq!(a.join().unwrap().values.get_list("packages"), ["a"]);
        assert_eq!(b.join().unwrap().values.get_str("pkg"), Some("b"));
    });
}
