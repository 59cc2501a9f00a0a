//! A small package manager grammar used across the tests.

use argshape::{
    array, boolean, counter, optional_positional, positional, proxy, rest, string, validate,
    Command, Field, Grammar,
};

pub fn grammar() -> Grammar {
    let verbose: Vec<Field> = vec![counter("-v,--verbose")];

    let mut grammar = Grammar::new();
    grammar
        .command(Command::new("").fields(verbose.clone()).field(boolean("--version")))
        .unwrap()
        .command(Command::new("add").field(boolean("-f,--force")).field(positional("pkg")))
        .unwrap()
        .command(Command::new("install").field(boolean("--frozen")).field(rest("packages")))
        .unwrap()
        .command(
            Command::new("build")
                .fields(verbose.clone())
                .field(array("--foo"))
                .field(string("--mode").validate(validate::is_one_of(&["dev", "prod"])))
                .field(string("-j,--jobs").validate(validate::is_integer())),
        )
        .unwrap()
        .command(
            Command::new("run").fields(verbose).field(positional("script")).field(proxy("args")),
        )
        .unwrap()
        .command(Command::new("exec").field(proxy("args")))
        .unwrap()
        .command(Command::new("remote").field(boolean("--list")))
        .unwrap()
        .command(Command::new("remote add").field(positional("name")).field(positional("url")))
        .unwrap()
        .command(Command::new("remote remove").field(positional("name")))
        .unwrap()
        .command(Command::new("cp").field(optional_positional("src")).field(positional("dst")))
        .unwrap()
        .command(Command::new("deploy").field(boolean("--all")))
        .unwrap()
        .command(Command::new("deploy").field(positional("target")))
        .unwrap();
    grammar
}
