//! pipesh: interactive shell front end.
//!
//! Without `-c` it reads command lines from stdin, printing `<cwd>> `
//! before each one. With `-c COMMAND` it runs a single line against the
//! process stdin and exits 1 if it failed.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use pipesh::config::Config;
use pipesh::error::ShellError;
use pipesh::eval::{Environment, Shell};

const USAGE: &str = "\
usage: pipesh [--config PATH] [--verbose] [--json] [-c COMMAND] [--dump-config]

  --config PATH   merge PATH over the default configuration
  --verbose       log debug output to stderr
  --json          print one JSON object per executed line
  -c COMMAND      run COMMAND and exit
  --dump-config   print the merged configuration as TOML and exit";

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    verbose: bool,
    json: bool,
    command: Option<String>,
    dump_config: bool,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config requires a path")?;
                let expanded = shellexpand::tilde(&path).into_owned();
                options.config = Some(PathBuf::from(expanded));
            }
            "--verbose" | "-v" => options.verbose = true,
            "--json" => options.json = true,
            "-c" => options.command = Some(args.next().ok_or("-c requires a command")?),
            "--dump-config" => options.dump_config = true,
            "--help" | "-h" => options.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

/// Print one line's result. Returns whether it succeeded.
fn report(output: &[u8], result: Result<(), ShellError>, json: bool) -> bool {
    let ok = result.is_ok();
    if json {
        let value = serde_json::json!({
            "output": String::from_utf8_lossy(output),
            "error": result.err().map(|e| e.to_string()),
        });
        println!("{value}");
    } else {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(output);
        let _ = stdout.flush();
        if let Err(e) = result {
            eprintln!("{e}");
        }
    }
    ok
}

fn repl(shell: &mut Shell, json: bool) {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", shell.environment().cwd().display());
        let _ = std::io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("pipesh: failed to read input: {e}");
                break;
            }
            None => break,
        };

        let mut output = Vec::new();
        let result = shell.execute(&line, &mut output);
        report(&output, result, json);
    }
}

fn main() {
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("pipesh: {e}\n{USAGE}");
            std::process::exit(2);
        }
    };
    if options.help {
        println!("{USAGE}");
        return;
    }

    let config = Config::load(options.config.as_deref());
    if options.dump_config {
        match config.to_toml() {
            Ok(toml) => print!("{toml}"),
            Err(e) => {
                eprintln!("pipesh: failed to render config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    pipesh::logging::init(&config.logging, options.verbose);

    let env = match Environment::from_process() {
        Ok(env) => env,
        Err(e) => {
            eprintln!("pipesh: cannot determine current directory: {e}");
            std::process::exit(1);
        }
    };
    let mut shell = Shell::from_config(&config, env);

    match options.command {
        Some(command) => {
            let mut output = Vec::new();
            let result = shell.execute_with_input(&command, &mut std::io::stdin().lock(), &mut output);
            if !report(&output, result, options.json) {
                std::process::exit(1);
            }
        }
        None => repl(&mut shell, options.json),
    }
}
