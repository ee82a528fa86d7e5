use super::{AppError, Application, Context};

/// The echo application - print arguments separated by spaces.
///
/// Usage: echo [ARG...]
pub struct Echo;

impl Application for Echo {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        writeln!(ctx.stdout, "{}", ctx.args.join(" "))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::testing::run;
    use crate::eval::Environment;

    #[test]
    fn echo_joins_args() {
        let env = Environment::new("/");
        assert_eq!(run(&Echo, &env, &["a", "b c"], "").unwrap(), "a b c\n");
    }

    #[test]
    fn echo_no_args_prints_newline() {
        let env = Environment::new("/");
        assert_eq!(run(&Echo, &env, &[], "").unwrap(), "\n");
    }
}
