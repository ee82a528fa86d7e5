//! Filesystem mutation applications (mv, rm, mkdir)

use super::{AppError, Application, Context};

/// Split a leading `-X` flag from the operands.
fn take_flag<'a>(args: &'a [String], flag: &str) -> (bool, &'a [String]) {
    match args.split_first() {
        Some((first, rest)) if first == flag => (true, rest),
        _ => (false, args),
    }
}

/// The mv application - rename, or move into a directory.
///
/// Usage: mv SRC DST | mv SRC... DIR
pub struct Mv;

impl Application for Mv {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let Some((target, sources)) = ctx.args.split_last() else {
            return Err(AppError::usage("missing file operand"));
        };
        if sources.is_empty() {
            return Err(AppError::usage(format!(
                "missing destination file operand after '{target}'"
            )));
        }

        let dest = ctx.env.resolve(target);
        let into_dir = dest.is_dir();
        if sources.len() > 1 && !into_dir {
            return Err(AppError::usage(format!("target '{target}' is not a directory")));
        }

        for source in sources {
            let from = ctx.env.resolve(source);
            let to = match (into_dir, from.file_name()) {
                (true, Some(name)) => dest.join(name),
                _ => dest.clone(),
            };
            std::fs::rename(&from, &to).map_err(|e| AppError::file(source, e))?;
        }
        Ok(())
    }
}

/// The rm application - remove files, and directories with `-r`.
///
/// Usage: rm [-r] PATH...
pub struct Rm;

impl Application for Rm {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let (recursive, paths) = take_flag(ctx.args, "-r");
        if paths.is_empty() {
            return Err(AppError::usage("missing operand"));
        }

        for name in paths {
            let path = ctx.env.resolve(name);
            let metadata = std::fs::symlink_metadata(&path).map_err(|e| AppError::file(name, e))?;
            let result = if metadata.is_dir() {
                if !recursive {
                    return Err(AppError::usage(format!("cannot remove '{name}': Is a directory")));
                }
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
            result.map_err(|e| AppError::file(name, e))?;
        }
        Ok(())
    }
}

/// The mkdir application.
///
/// Usage: mkdir [-p] DIR...
///
/// With `-p` missing parents are created and existing directories are not
/// an error.
pub struct Mkdir;

impl Application for Mkdir {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let (parents, dirs) = take_flag(ctx.args, "-p");
        if dirs.is_empty() {
            return Err(AppError::usage("missing operand"));
        }

        for name in dirs {
            let path = ctx.env.resolve(name);
            let result = if parents {
                std::fs::create_dir_all(&path)
            } else {
                std::fs::create_dir(&path)
            };
            result.map_err(|e| AppError::file(name, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::testing::run;
    use crate::eval::Environment;

    #[test]
    fn mv_renames() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "x").unwrap();
        let env = Environment::new(dir.path());
        run(&Mv, &env, &["a", "b"], "").unwrap();
        assert!(!dir.path().join("a").exists());
        assert_eq!(std::fs::read_to_string(dir.path().join("b")).unwrap(), "x");
    }

    #[test]
    fn mv_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "").unwrap();
        std::fs::write(dir.path().join("b"), "").unwrap();
        std::fs::create_dir(dir.path().join("d")).unwrap();
        let env = Environment::new(dir.path());
        run(&Mv, &env, &["a", "b", "d"], "").unwrap();
        assert!(dir.path().join("d/a").exists());
        assert!(dir.path().join("d/b").exists());
    }

    #[test]
    fn mv_many_into_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a", "b", "c"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let env = Environment::new(dir.path());
        assert!(run(&Mv, &env, &["a", "b", "c"], "").is_err());
        assert!(run(&Mv, &env, &["a"], "").is_err());
    }

    #[test]
    fn rm_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f"), "").unwrap();
        std::fs::create_dir_all(dir.path().join("d/inner")).unwrap();
        let env = Environment::new(dir.path());

        run(&Rm, &env, &["f"], "").unwrap();
        assert!(!dir.path().join("f").exists());

        assert!(run(&Rm, &env, &["d"], "").is_err());
        run(&Rm, &env, &["-r", "d"], "").unwrap();
        assert!(!dir.path().join("d").exists());
    }

    #[test]
    fn rm_missing_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let env = Environment::new(dir.path());
        let err = run(&Rm, &env, &["ghost"], "").unwrap_err();
        assert_eq!(err.to_string(), "ghost: No such file or directory");
    }

    #[test]
    fn mkdir_with_and_without_parents() {
        let dir = tempfile::tempdir().unwrap();
        let env = Environment::new(dir.path());
        assert!(run(&Mkdir, &env, &["x/y"], "").is_err());
        run(&Mkdir, &env, &["-p", "x/y"], "").unwrap();
        assert!(dir.path().join("x/y").is_dir());
        run(&Mkdir, &env, &["-p", "x/y"], "").unwrap();
        assert!(run(&Mkdir, &env, &["x"], "").is_err());
    }
}
