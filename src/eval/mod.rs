pub mod context;
pub mod registry;
pub mod resolve;

pub use context::Environment;
pub use registry::ApplicationRegistry;
pub use resolve::{ArgumentResolver, SubstitutionContext};

use std::io::{Read, Write};
use std::path::Path;

use log::{debug, warn};

use crate::apps::{Context, Registered};
use crate::config::Config;
use crate::error::{Result, ShellError};
use crate::parse::{self, CallCommand, Command, PipeCommand, SequenceCommand};
use crate::redirect;

/// The evaluator: owns the registry and the environment and runs parsed
/// commands against them.
pub struct Shell {
    registry: ApplicationRegistry,
    env: Environment,
    resolver: ArgumentResolver,
    max_depth: usize,
    unsafe_prefix: bool,
    depth: usize,
}

impl Shell {
    /// Build a shell from configuration, starting in `env`.
    pub fn from_config(config: &Config, env: Environment) -> Self {
        Self {
            registry: ApplicationRegistry::from_config(config),
            env,
            resolver: ArgumentResolver::new(config.settings.glob_hidden),
            max_depth: config.settings.max_substitution_depth,
            unsafe_prefix: config.settings.unsafe_prefix,
            depth: 0,
        }
    }

    /// A shell with the default configuration.
    pub fn new(env: Environment) -> Self {
        Self::from_config(&Config::default_config(), env)
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Install a custom application.
    pub fn register(&mut self, name: impl Into<String>, app: Registered) {
        self.registry.register(name, app);
    }

    /// Parse and run one command line with an empty stdin.
    pub fn execute(&mut self, line: &str, stdout: &mut dyn Write) -> Result<()> {
        self.execute_with_input(line, &mut std::io::empty(), stdout)
    }

    /// Parse and run one command line. Blank lines do nothing.
    pub fn execute_with_input(
        &mut self,
        line: &str,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<()> {
        let Some(command) = parse::parse_command(line)? else {
            return Ok(());
        };
        debug!("parsed: {command:?}");
        self.evaluate(&command, stdin, stdout)
    }

    /// Run a parsed command.
    pub fn evaluate(
        &mut self,
        command: &Command,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<()> {
        match command {
            Command::Call(call) => self.eval_call(call, stdin, stdout),
            Command::Pipe(pipe) => self.eval_pipe(pipe, stdin, stdout),
            Command::Sequence(seq) => self.eval_sequence(seq, stdin, stdout),
        }
    }

    fn eval_call(
        &mut self,
        call: &CallCommand,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<()> {
        redirect::check(&call.redirections)?;
        let resolver = self.resolver;
        let args = resolver.resolve_all(&call.words, self)?;
        let mut streams = redirect::open(&call.redirections, &resolver, self)?;

        let Some((name, rest)) = args.split_first() else {
            return Err(ShellError::syntax("empty command"));
        };
        debug!(
            "call: {}",
            shlex::try_join(args.iter().map(String::as_str)).unwrap_or_else(|_| args.join(" "))
        );

        // `_name` reports the failure of `name` as output instead of failing.
        let (app_name, tolerant) = match name.strip_prefix('_') {
            Some(inner) if self.unsafe_prefix && !inner.is_empty() && !self.registry.contains(name) => {
                (inner, true)
            }
            _ => (name.as_str(), false),
        };
        let app = self
            .registry
            .get(app_name)
            .ok_or_else(|| ShellError::UnknownApplication(app_name.to_string()))?;

        let input: &mut dyn Read = match streams.input.as_mut() {
            Some(file) => file,
            None => stdin,
        };
        let output: &mut dyn Write = match streams.output.as_mut() {
            Some(file) => file,
            None => stdout,
        };

        let result = match app {
            Registered::Stateless(app) => app.run(Context {
                args: rest,
                env: &self.env,
                stdin: &mut *input,
                stdout: &mut *output,
            }),
            Registered::Stateful(app) => app.run(rest, &mut self.env, &mut *output),
        };

        match result {
            Ok(()) => Ok(()),
            Err(source) if tolerant => {
                writeln!(output, "{app_name}: {source}")?;
                Ok(())
            }
            Err(source) => Err(ShellError::Application {
                app: app_name.to_string(),
                source,
            }),
        }
    }

    /// Stages run one after another, each reading the previous stage's
    /// complete output. Nothing reaches `stdout` unless every stage succeeds.
    fn eval_pipe(
        &mut self,
        pipe: &PipeCommand,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<()> {
        let mut buffer: Option<Vec<u8>> = None;
        for stage in &pipe.stages {
            let mut output = Vec::new();
            match &buffer {
                None => self.eval_call(stage, stdin, &mut output)?,
                Some(previous) => self.eval_call(stage, &mut previous.as_slice(), &mut output)?,
            }
            buffer = Some(output);
        }
        if let Some(output) = buffer {
            stdout.write_all(&output)?;
        }
        Ok(())
    }

    fn eval_sequence(
        &mut self,
        seq: &SequenceCommand,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<()> {
        let mut failures = Vec::new();
        for item in &seq.items {
            if let Err(e) = self.evaluate(item, stdin, stdout) {
                warn!("sequence item failed: {e}");
                failures.push(e);
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ShellError::Sequence(failures))
        }
    }

    fn capture(&mut self, command: &str) -> Result<String> {
        let mut output = Vec::new();
        if let Some(parsed) = parse::parse_command(command)? {
            self.evaluate(&parsed, &mut std::io::empty(), &mut output)?;
        }
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

impl SubstitutionContext for Shell {
    fn cwd(&self) -> &Path {
        self.env.cwd()
    }

    fn substitute(&mut self, command: &str) -> Result<String> {
        if self.depth >= self.max_depth {
            return Err(ShellError::SubstitutionDepth(self.max_depth));
        }
        self.depth += 1;
        let result = self.capture(command);
        self.depth -= 1;
        result.map_err(|source| ShellError::Substitution {
            command: command.to_string(),
            source: Box::new(source),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::{AppError, Application};

    fn shell_in(dir: &Path) -> Shell {
        Shell::new(Environment::new(dir))
    }

    fn run(shell: &mut Shell, line: &str) -> (String, Result<()>) {
        let mut out = Vec::new();
        let result = shell.execute(line, &mut out);
        (String::from_utf8(out).unwrap(), result)
    }

    #[test]
    fn call_writes_output() {
        let mut shell = Shell::new(Environment::new("/"));
        let (out, result) = run(&mut shell, "echo hello world");
        assert!(result.is_ok());
        assert_eq!(out, "hello world\n");
    }

    #[test]
    fn blank_line_is_noop() {
        let mut shell = Shell::new(Environment::new("/"));
        let (out, result) = run(&mut shell, "   ");
        assert!(result.is_ok());
        assert_eq!(out, "");
    }

    #[test]
    fn unknown_application() {
        let mut shell = Shell::new(Environment::new("/"));
        let (_, result) = run(&mut shell, "frobnicate x");
        assert!(matches!(result, Err(ShellError::UnknownApplication(name)) if name == "frobnicate"));
    }

    #[test]
    fn empty_command_after_substitution() {
        let mut shell = Shell::new(Environment::new("/"));
        let (_, result) = run(&mut shell, "`echo`");
        assert!(matches!(result, Err(ShellError::Syntax(_))));
    }

    #[test]
    fn application_failure_is_prefixed() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_in(dir.path());
        let (_, result) = run(&mut shell, "cat missing.txt");
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "cat: missing.txt: No such file or directory");
    }

    #[test]
    fn pipe_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_in(dir.path());
        let (out, result) = run(&mut shell, "echo a | cat missing | cat");
        assert!(matches!(result, Err(ShellError::Application { ref app, .. }) if app == "cat"));
        assert_eq!(out, "");
    }

    #[test]
    fn pipe_reads_caller_stdin() {
        let mut shell = Shell::new(Environment::new("/"));
        let mut out = Vec::new();
        shell
            .execute_with_input("cat | sort", &mut "b\na\n".as_bytes(), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\nb\n");
    }

    #[test]
    fn sequence_runs_everything_and_collects_failures() {
        let mut shell = Shell::new(Environment::new("/"));
        let (out, result) = run(&mut shell, "nope; echo one; nada; echo two");
        assert_eq!(out, "one\ntwo\n");
        let err = result.unwrap_err();
        let failures = err.failures();
        assert_eq!(failures.len(), 2);
        assert!(matches!(failures[0], ShellError::UnknownApplication(n) if n == "nope"));
        assert!(matches!(failures[1], ShellError::UnknownApplication(n) if n == "nada"));
    }

    #[test]
    fn duplicate_redirection_fails_only_its_call() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_in(dir.path());
        let (out, result) = run(&mut shell, "echo a > x > y ; echo b");
        assert_eq!(out, "b\n");
        let err = result.unwrap_err();
        let failures = err.failures();
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], ShellError::Redirection(_)));
        assert!(!dir.path().join("x").exists());
        assert!(!dir.path().join("y").exists());
    }

    #[test]
    fn substitution_feeds_arguments() {
        let mut shell = Shell::new(Environment::new("/"));
        let (out, _) = run(&mut shell, "echo `echo a b`c");
        assert_eq!(out, "a bc\n");
    }

    #[test]
    fn substitution_failure_is_wrapped() {
        let mut shell = Shell::new(Environment::new("/"));
        let (out, result) = run(&mut shell, "echo `nope`");
        assert_eq!(out, "");
        assert!(matches!(result, Err(ShellError::Substitution { ref command, .. }) if command == "nope"));
    }

    #[test]
    fn substitution_depth_cap() {
        let mut config = Config::default_config();
        config.settings.max_substitution_depth = 0;
        let mut shell = Shell::from_config(&config, Environment::new("/"));
        let (_, result) = run(&mut shell, "echo `echo a`");
        assert!(matches!(result, Err(ShellError::SubstitutionDepth(0))));
    }

    #[test]
    fn cd_updates_environment_for_later_calls() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let mut shell = shell_in(dir.path());
        let (out, result) = run(&mut shell, "cd sub; pwd");
        assert!(result.is_ok());
        assert_eq!(out, format!("{}\n", dir.path().join("sub").display()));
        assert_eq!(shell.environment().cwd(), dir.path().join("sub"));
    }

    #[test]
    fn output_redirection_bypasses_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_in(dir.path());
        let (out, result) = run(&mut shell, "echo saved > out.txt");
        assert!(result.is_ok());
        assert_eq!(out, "");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("out.txt")).unwrap(),
            "saved\n"
        );
    }

    #[test]
    fn unsafe_prefix_reports_failure_as_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_in(dir.path());
        let (out, result) = run(&mut shell, "_cat missing.txt | cat; echo after");
        assert!(result.is_ok());
        assert_eq!(out, "cat: missing.txt: No such file or directory\nafter\n");
    }

    #[test]
    fn unsafe_prefix_can_be_disabled() {
        let mut config = Config::default_config();
        config.settings.unsafe_prefix = false;
        let mut shell = Shell::from_config(&config, Environment::new("/"));
        let (_, result) = run(&mut shell, "_echo hi");
        assert!(matches!(result, Err(ShellError::UnknownApplication(n)) if n == "_echo"));
    }

    struct Shout;

    impl Application for Shout {
        fn run(&self, ctx: Context<'_>) -> std::result::Result<(), AppError> {
            let mut text = String::new();
            ctx.stdin.read_to_string(&mut text)?;
            ctx.stdout.write_all(text.to_uppercase().as_bytes())?;
            Ok(())
        }
    }

    #[test]
    fn registered_application_joins_pipes() {
        let mut shell = Shell::new(Environment::new("/"));
        shell.register("shout", Registered::Stateless(Box::new(Shout)));
        let (out, result) = run(&mut shell, "echo quiet | shout");
        assert!(result.is_ok());
        assert_eq!(out, "QUIET\n");
    }
}
