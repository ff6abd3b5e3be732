//! Running the external tools that produce binary fonts.

use std::fmt;
use std::io;
use std::path::Path;
use std::process::Command;

use crate::font::ExportOptions;
use crate::sfnt;
use crate::Error;

/// The default command used to compile a UFO source to OpenType.
pub const DEFAULT_OTF_COMMAND: &str = "fontmake -u {input} -o otf --output-path {output}";
/// The default command used to compress an OpenType font to WOFF2.
pub const DEFAULT_WOFF2_COMMAND: &str = "fonttools ttLib.woff2 compress -o {output} {input}";

/// What happened when we asked for a web font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebFont {
    Written,
    /// The converter isn't installed; nothing was written.
    Unavailable,
}

/// Produces binary font files.
pub trait Compiler {
    /// Compile the font source at `source` into an OpenType file at `output`.
    fn compile_otf(
        &self,
        source: &Path,
        output: &Path,
        options: &ExportOptions,
    ) -> Result<(), Error>;

    /// Compress the OpenType file at `otf` into a WOFF2 file at `output`.
    fn compress_woff2(&self, otf: &Path, output: &Path) -> Result<WebFont, Error>;
}

/// A command line with `{input}` and `{output}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    program: String,
    args: Vec<String>,
}

impl CommandTemplate {
    /// Split a template on whitespace; the first word is the program.
    pub fn parse(template: &str) -> Result<CommandTemplate, Error> {
        let mut words = template.split_whitespace().map(String::from);
        let program = words
            .next()
            .ok_or_else(|| Error::EmptyCommand(template.to_string()))?;
        Ok(CommandTemplate {
            program,
            args: words.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments with the placeholders filled in.
    pub fn args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace("{input}", &input).replace("{output}", &output))
            .collect()
    }

    fn run(&self, input: &Path, output: &Path) -> Result<(), RunError> {
        let args = self.args(input, output);
        log::debug!("running {} {}", self.program, args.join(" "));
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(RunError::Launch)?;
        if status.success() {
            Ok(())
        } else {
            Err(RunError::Failed(status))
        }
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

enum RunError {
    Launch(io::Error),
    Failed(std::process::ExitStatus),
}

impl RunError {
    fn into_error(self, program: &str) -> Error {
        match self {
            RunError::Launch(source) => Error::Launch {
                program: program.to_string(),
                source,
            },
            RunError::Failed(status) => Error::Compile {
                program: program.to_string(),
                status,
            },
        }
    }
}

/// A [`Compiler`] that runs external programs.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    otf: CommandTemplate,
    woff2: Option<CommandTemplate>,
}

impl CommandCompiler {
    pub fn new(otf: CommandTemplate, woff2: Option<CommandTemplate>) -> Self {
        CommandCompiler { otf, woff2 }
    }

    /// Build a compiler from two templates; an empty WOFF2 template
    /// disables web fonts.
    pub fn from_templates(otf: &str, woff2: &str) -> Result<Self, Error> {
        let woff2 = if woff2.trim().is_empty() {
            None
        } else {
            Some(CommandTemplate::parse(woff2)?)
        };
        Ok(CommandCompiler::new(CommandTemplate::parse(otf)?, woff2))
    }
}

impl Default for CommandCompiler {
    fn default() -> Self {
        CommandCompiler {
            otf: CommandTemplate {
                program: "fontmake".into(),
                args: ["-u", "{input}", "-o", "otf", "--output-path", "{output}"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            woff2: Some(CommandTemplate {
                program: "fonttools".into(),
                args: ["ttLib.woff2", "compress", "-o", "{output}", "{input}"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

impl Compiler for CommandCompiler {
    fn compile_otf(
        &self,
        source: &Path,
        output: &Path,
        options: &ExportOptions,
    ) -> Result<(), Error> {
        log::debug!("compiling {:?}", source);
        self.otf
            .run(source, output)
            .map_err(|e| e.into_error(self.otf.program()))?;
        sfnt::finish_font(output, options)
    }

    fn compress_woff2(&self, otf: &Path, output: &Path) -> Result<WebFont, Error> {
        let template = match self.woff2.as_ref() {
            Some(template) => template,
            None => return Ok(WebFont::Unavailable),
        };
        match template.run(otf, output) {
            Ok(()) => Ok(WebFont::Written),
            Err(RunError::Launch(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!(
                    "'{}' not found, skipping WOFF2 for {:?}",
                    template.program(),
                    otf
                );
                Ok(WebFont::Unavailable)
            }
            Err(e) => Err(e.into_error(template.program())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn default_templates() {
        let compiler = CommandCompiler::default();
        assert_eq!(compiler.otf.to_string(), DEFAULT_OTF_COMMAND);
        assert_eq!(
            compiler.woff2.as_ref().map(ToString::to_string).as_deref(),
            Some(DEFAULT_WOFF2_COMMAND)
        );
        let parsed =
            CommandCompiler::from_templates(DEFAULT_OTF_COMMAND, DEFAULT_WOFF2_COMMAND).unwrap();
        assert_eq!(parsed.otf, compiler.otf);
        assert_eq!(parsed.woff2, compiler.woff2);
    }

    #[test]
    fn placeholders() {
        let template = CommandTemplate::parse("tool --in={input} {output}").unwrap();
        let args = template.args(&PathBuf::from("a.ufo"), &PathBuf::from("b.otf"));
        assert_eq!(template.program(), "tool");
        assert_eq!(args, vec!["--in=a.ufo", "b.otf"]);
    }

    #[test]
    fn empty_template() {
        assert!(matches!(
            CommandTemplate::parse("   "),
            Err(Error::EmptyCommand(_))
        ));
        let compiler = CommandCompiler::from_templates("fontmake", "").unwrap();
        assert!(compiler.woff2.is_none());
    }

    #[test]
    fn missing_converter_is_not_fatal() {
        let compiler = CommandCompiler::from_templates(
            "hexmono-no-such-compiler {input} {output}",
            "hexmono-no-such-converter {input} {output}",
        )
        .unwrap();
        let dir = std::env::temp_dir();
        let result = compiler.compress_woff2(&dir.join("a.otf"), &dir.join("a.woff2"));
        assert_eq!(result.unwrap(), WebFont::Unavailable);
    }

    #[test]
    fn missing_compiler_is_fatal() {
        let compiler =
            CommandCompiler::from_templates("hexmono-no-such-compiler {input} {output}", "")
                .unwrap();
        let dir = std::env::temp_dir();
        let result =
            compiler.compile_otf(&dir.join("a.ufo"), &dir.join("a.otf"), &Default::default());
        assert!(matches!(result, Err(Error::Launch { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn compiled_font_gets_signature() {
        use crate::sfnt::{FontFile, Table};

        let dir = std::env::temp_dir().join(format!("hexmono-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let source = dir.join("a.bin");
        let output = dir.join("a.otf");
        let font = FontFile {
            version: 0x4F54_544F,
            tables: vec![
                Table {
                    tag: *b"head",
                    data: vec![0; 54],
                },
                Table {
                    tag: *b"prep",
                    data: vec![1, 2, 3],
                },
            ],
        };
        std::fs::write(&source, font.to_bytes()).unwrap();

        let compiler = CommandCompiler::from_templates("cp {input} {output}", "").unwrap();
        compiler
            .compile_otf(&source, &output, &ExportOptions::default())
            .unwrap();
        let compiled = FontFile::parse(&std::fs::read(&output).unwrap()).unwrap();
        assert!(compiled.table(b"DSIG").is_some());
        assert!(compiled.table(b"prep").is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
