// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
use clap::crate_authors;
use structopt::StructOpt;

use std::fs;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use alr_gen::emit_c::CEmitter;
use alr_gen::emit_cpp::CppEmitter;
use alr_gen::emitter::{Emitter, EmitterConfig, EmitterView};
use alr_gen::options::{Lang, Options};
use alr_gen::report;
use alr_gen::surface::parser::Parser as SurfaceParser;
use alr_gen::Generator;

fn with_changed_extension(path: &Path, new_extension: &str) -> PathBuf {
    let mut new_path = PathBuf::new();
    if let Some(dir) = path.parent() {
        new_path.push(dir);
    }
    new_path.push(path.file_stem().unwrap());
    new_path.set_extension(new_extension);
    new_path
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "alr_gen",
    about = "LALR(1) parser generator",
    author = crate_authors!(),
)]
struct CLOptions {
    /// Report prints basis configurations only, not the full closure.
    #[structopt(short, long)]
    basis: bool,
    /// Skip default-reduce action-table compression.
    #[structopt(short, long)]
    no_compress: bool,
    /// Reprint the grammar only; skip code generation.
    #[structopt(short, long)]
    grammar_no_actions: bool,
    /// Select the code generator backend.
    #[structopt(short, long, default_value = "c")]
    lang: Lang,
    /// Emit debug traces in the generated parser.
    #[structopt(short, long)]
    debug: bool,
    /// Produce a <stem>.out report file.
    #[structopt(short, long)]
    verbose: bool,
    /// Print summary statistics to stdout.
    #[structopt(short, long)]
    stats: bool,
    /// Overwrite output files if they already exist.
    #[structopt(short, long)]
    force: bool,
    /// Total number of unresolved conflicts that are expected.
    #[structopt(short, long)]
    expect: Option<usize>,
    /// The grammar specification file.
    #[structopt(parse(from_os_str))]
    specification: PathBuf,
}

fn die_usage(message: &str) -> ! {
    let _ = writeln!(std::io::stderr(), "{}", message);
    std::process::exit(1);
}

fn main() {
    let cl_options = CLOptions::from_args();
    let label = cl_options.specification.to_string_lossy().to_string();

    let mut source_text = String::new();
    match fs::File::open(&cl_options.specification).and_then(|mut f| f.read_to_string(&mut source_text)) {
        Ok(_) => {}
        Err(error) => die_usage(&format!("{}: {}", label, error)),
    }

    let mut generator = Generator::new(Options {
        basis_only: cl_options.basis,
        no_compress: cl_options.no_compress,
        grammar_no_actions: cl_options.grammar_no_actions,
        lang: cl_options.lang,
        debug: cl_options.debug,
        verbose: cl_options.verbose,
        stats: cl_options.stats,
        expected_conflicts: cl_options.expect.unwrap_or(0),
    });
    let mut config = EmitterConfig::default();

    let mut parser = match SurfaceParser::new(&source_text, &label) {
        Ok(parser) => parser,
        Err(error) => die_usage(&format!("{}", error)),
    };
    if let Err(error) = parser.parse(&mut generator, &mut config) {
        die_usage(&format!("{}", error));
    }

    if generator.reporter.has_errors() {
        for diagnostic in generator.reporter.errors() {
            eprintln!("{}", diagnostic);
        }
        std::process::exit(1);
    }

    if let Err(error) = generator.build() {
        die_usage(&format!("{}", error));
    }

    for diagnostic in generator.reporter.warnings() {
        eprintln!("{}", diagnostic);
    }
    if generator.reporter.has_errors() {
        for diagnostic in generator.reporter.errors() {
            eprintln!("{}", diagnostic);
        }
        std::process::exit(1);
    }

    if let Some(expected) = cl_options.expect {
        let actual = generator.total_unresolved_conflicts();
        if actual != expected {
            eprintln!(
                "{}: expected {} unresolved conflict(s), found {}",
                label, expected, actual
            );
        }
    }

    if cl_options.verbose {
        let report_path = with_changed_extension(&cl_options.specification, "out");
        if !report_path.exists() || cl_options.force {
            match fs::File::create(&report_path) {
                Ok(mut file) => {
                    if let Err(error) = report::write_report(&generator, cl_options.basis, &mut file) {
                        die_usage(&format!("{}: {}", report_path.to_string_lossy(), error));
                    }
                }
                Err(error) => die_usage(&format!("{}: {}", report_path.to_string_lossy(), error)),
            }
        }
    }

    if cl_options.stats {
        println!(
            "symbols: {}  rules: {}  states: {}  conflicts: {}",
            generator.symbols.count(),
            generator.rules.count(),
            generator.states.count(),
            generator.total_unresolved_conflicts()
        );
    }

    if !cl_options.grammar_no_actions {
        let view = EmitterView::new(&generator);
        let backend: Box<dyn Emitter> = match cl_options.lang {
            Lang::C => Box::new(CEmitter),
            Lang::Cpp => Box::new(CppEmitter { with_runtime: false }),
            Lang::CppRuntime => Box::new(CppEmitter { with_runtime: true }),
        };
        let (header_path, source_path) =
            alr_gen::emitter::output_paths(&cl_options.specification.with_extension(""), cl_options.lang);

        if let Some(header_path) = header_path {
            if header_path.exists() && !cl_options.force {
                die_usage(&format!("{}: output file already exists", header_path.to_string_lossy()));
            }
            match fs::File::create(&header_path) {
                Ok(mut file) => {
                    if let Err(error) = backend.emit_header(&view, &config, &mut file) {
                        die_usage(&format!("{}: {}", header_path.to_string_lossy(), error));
                    }
                }
                Err(error) => die_usage(&format!("{}: {}", header_path.to_string_lossy(), error)),
            }
        }

        if source_path.exists() && !cl_options.force {
            die_usage(&format!("{}: output file already exists", source_path.to_string_lossy()));
        }
        match fs::File::create(&source_path) {
            Ok(mut file) => {
                if let Err(error) = backend.emit_source(&view, &config, &mut file) {
                    die_usage(&format!("{}: {}", source_path.to_string_lossy(), error));
                }
            }
            Err(error) => die_usage(&format!("{}: {}", source_path.to_string_lossy(), error)),
        }
    }

    std::process::exit(generator.total_unresolved_conflicts() as i32);
}
