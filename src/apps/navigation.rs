//! Navigation applications (cd, pwd, ls)

use std::io::Write;

use super::{AppError, Application, Context, EnvApplication};
use crate::eval::Environment;

/// The cd application - change the current directory.
///
/// Usage: cd DIR
pub struct Cd;

impl EnvApplication for Cd {
    fn run(
        &self,
        args: &[String],
        env: &mut Environment,
        _stdout: &mut dyn Write,
    ) -> Result<(), AppError> {
        let target = match args {
            [] => return Err(AppError::usage("missing argument")),
            [one] => one,
            _ => return Err(AppError::usage("too many arguments")),
        };

        let path = env.resolve(target);
        let metadata = std::fs::metadata(&path).map_err(|e| AppError::file(target, e))?;
        if !metadata.is_dir() {
            return Err(AppError::usage(format!("{target}: Not a directory")));
        }
        env.change_dir(path);
        Ok(())
    }
}

/// The pwd application - print the current directory.
pub struct Pwd;

impl Application for Pwd {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        writeln!(ctx.stdout, "{}", ctx.env.cwd().display())?;
        Ok(())
    }
}

/// The ls application - list a directory.
///
/// Usage: ls [DIR]
///
/// Entries whose names start with a dot are skipped. Names are sorted and
/// printed one per line.
pub struct Ls;

impl Application for Ls {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let (shown, path) = match ctx.args {
            [] => (".".to_string(), ctx.env.cwd().to_path_buf()),
            [one] => (one.clone(), ctx.env.resolve(one)),
            _ => return Err(AppError::usage("too many arguments")),
        };

        let entries = std::fs::read_dir(&path).map_err(|e| AppError::file(&shown, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AppError::file(&shown, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();

        for name in names {
            writeln!(ctx.stdout, "{name}")?;
        }
        Ok(())
    }
}
