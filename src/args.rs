//! Command line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use hexmono_lib::consts::{ASCII_END, GLYPHS_PER_FILE};
use hexmono_lib::export::{DEFAULT_OTF_COMMAND, DEFAULT_WOFF2_COMMAND};
use hexmono_lib::generator::GeneratorConfig;
use hexmono_lib::PartitionStrategy;

#[derive(Parser, Debug)]
#[command(
    name = "unicode-hex-mono",
    version,
    about = "Generate a font whose glyphs show their own codepoint in hex"
)]
pub struct Cli {
    /// Directory that fonts and the stylesheet are written to
    #[arg(long, global = true, value_name = "DIR", default_value = "dist")]
    pub out_dir: PathBuf,

    /// File of `KEY: value` lines overriding the default metrics
    #[arg(long, global = true, value_name = "FILE")]
    pub metrics: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate every font file, then the stylesheet
    Build(BuildArgs),
    /// Generate only the U+0000 - U+00FF font file
    Ascii(CompileArgs),
    /// Generate a small test font of hand-picked codepoints
    Sample(CompileArgs),
    /// Rescan the output directory and write font.css
    Css,
    /// Write SVG previews of the given codepoints
    Preview {
        /// Codepoints in hex, optionally prefixed with `U+` or `0x`
        #[arg(required = true, value_parser = parse_codepoint)]
        codepoints: Vec<u32>,
    },
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// The most codepoints written to one file
    #[arg(long, default_value_t = GLYPHS_PER_FILE)]
    pub glyphs_per_file: usize,

    /// How codepoints are split into files: ascii-first or uniform
    #[arg(long, default_value = "ascii-first")]
    pub strategy: PartitionStrategy,

    /// First codepoint to generate
    #[arg(long, value_parser = parse_codepoint, default_value = "0")]
    pub start: u32,

    /// Last codepoint to generate
    #[arg(long, value_parser = parse_codepoint, default_value = "10FFFD")]
    pub end: u32,

    /// Don't write font.css afterwards
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_css: bool,

    #[command(flatten)]
    pub compile: CompileArgs,
}

#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Skip WOFF2 conversion
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_woff2: bool,

    /// Keep the intermediate .ufo sources
    #[arg(long, action = ArgAction::SetTrue)]
    pub keep_sources: bool,

    /// Command compiling a source to OTF, with {input} and {output}
    #[arg(long, value_name = "TEMPLATE", default_value = DEFAULT_OTF_COMMAND)]
    pub otf_command: String,

    /// Command compressing an OTF to WOFF2, with {input} and {output}
    #[arg(long, value_name = "TEMPLATE", default_value = DEFAULT_WOFF2_COMMAND)]
    pub woff2_command: String,
}

impl BuildArgs {
    /// Apply these options on top of `config`.
    pub fn configure(&self, config: GeneratorConfig) -> GeneratorConfig {
        self.compile.configure(GeneratorConfig {
            glyphs_per_file: self.glyphs_per_file,
            strategy: self.strategy,
            range: self.start..=self.end,
            ..config
        })
    }
}

impl CompileArgs {
    /// Apply these options on top of `config`.
    pub fn configure(&self, config: GeneratorConfig) -> GeneratorConfig {
        GeneratorConfig {
            write_woff2: !self.no_woff2,
            keep_sources: self.keep_sources,
            otf_command: self.otf_command.clone(),
            woff2_command: self.woff2_command.clone(),
            ..config
        }
    }

    /// Apply these options on top of `config`, restricted to the two digit
    /// range.
    pub fn configure_ascii(&self, config: GeneratorConfig) -> GeneratorConfig {
        self.configure(GeneratorConfig {
            range: 0..=ASCII_END,
            ..config
        })
    }
}

/// Parse a hex codepoint such as `1F600`, `U+1F600` or `0x1F600`.
pub fn parse_codepoint(s: &str) -> Result<u32, String> {
    let digits = s
        .strip_prefix("U+")
        .or_else(|| s.strip_prefix("u+"))
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|e| format!("'{}' is not a hex codepoint: {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codepoints() {
        assert_eq!(parse_codepoint("41"), Ok(0x41));
        assert_eq!(parse_codepoint("U+1F600"), Ok(0x1F600));
        assert_eq!(parse_codepoint("0x10ffff"), Ok(0x10FFFF));
        assert!(parse_codepoint("U+").is_err());
        assert!(parse_codepoint("zz").is_err());
    }

    #[test]
    fn build_defaults() {
        let cli = Cli::try_parse_from(&["unicode-hex-mono", "build"]).unwrap();
        assert_eq!(cli.out_dir, PathBuf::from("dist"));
        assert!(!cli.verbose);
        match cli.command {
            Command::Build(args) => {
                assert_eq!(args.glyphs_per_file, 60_000);
                assert_eq!(args.strategy, PartitionStrategy::AsciiFirst);
                assert_eq!((args.start, args.end), (0, 0x10FFFD));
                assert!(!args.compile.no_woff2);
                assert_eq!(args.compile.otf_command, DEFAULT_OTF_COMMAND);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::try_parse_from(&[
            "unicode-hex-mono",
            "sample",
            "--no-woff2",
            "-v",
            "--out-dir",
            "out",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.out_dir, PathBuf::from("out"));
        let config = match cli.command {
            Command::Sample(args) => args.configure(GeneratorConfig::default()),
            other => panic!("unexpected command {:?}", other),
        };
        assert!(!config.write_woff2);
    }

    #[test]
    fn ascii_covers_two_digit_range() {
        let cli = Cli::try_parse_from(&["unicode-hex-mono", "ascii", "--keep-sources"]).unwrap();
        let config = match cli.command {
            Command::Ascii(args) => args.configure_ascii(GeneratorConfig::default()),
            other => panic!("unexpected command {:?}", other),
        };
        assert_eq!(config.range, 0..=0xFF);
        assert!(config.keep_sources);
        assert!(config.write_woff2);
    }

    #[test]
    fn build_range_and_budget() {
        let cli = Cli::try_parse_from(&[
            "unicode-hex-mono",
            "build",
            "--start",
            "U+0100",
            "--end",
            "0x1FF",
            "--glyphs-per-file",
            "64",
            "--strategy",
            "uniform",
        ])
        .unwrap();
        let config = match cli.command {
            Command::Build(args) => args.configure(GeneratorConfig::default()),
            other => panic!("unexpected command {:?}", other),
        };
        assert_eq!(config.range, 0x100..=0x1FF);
        assert_eq!(config.glyphs_per_file, 64);
        assert_eq!(config.strategy, PartitionStrategy::Uniform);
    }

    #[test]
    fn preview_needs_codepoints() {
        assert!(Cli::try_parse_from(&["unicode-hex-mono", "preview"]).is_err());
        let cli = Cli::try_parse_from(&["unicode-hex-mono", "preview", "41", "U+E12AB"]).unwrap();
        match cli.command {
            Command::Preview { codepoints } => assert_eq!(codepoints, vec![0x41, 0xE12AB]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn bad_strategy() {
        assert!(Cli::try_parse_from(&["unicode-hex-mono", "build", "--strategy", "random"]).is_err());
    }
}
