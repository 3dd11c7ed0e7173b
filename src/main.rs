use std::{fs::read_to_string, path::PathBuf, process, rc::Rc, time::Instant};

use clap::{Parser, ValueEnum};
use pins_compiler::{
    ast::ast::Ast,
    compiler::compiler::lower,
    display_error,
    errors::errors::Error,
    frames::{
        frame::LabelGenerator,
        frame_evaluator::{evaluate_frames, Layout},
    },
    lexer::lexer::tokenize,
    name_checker::name_checker::check_names,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};
use tracing_subscriber::EnvFilter;

/// Pipeline phase after which `pinsc` stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Phase {
    Lex,
    Parse,
    Names,
    Types,
    Frames,
    Ir,
}

#[derive(Parser)]
#[command(name = "pinsc", version, about = "The PINS compiler front and middle end")]
struct Cli {
    /// Source file to compile
    file: PathBuf,

    /// Stop after this phase
    #[arg(long, value_enum, default_value = "ir")]
    phase: Phase,

    /// Print the result of the last phase
    #[arg(long)]
    dump: bool,

    /// Log pass progress (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: could not read {}: {}", cli.file.display(), error);
            process::exit(2);
        }
    };

    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.display().to_string());

    if let Err(error) = run(&cli, &source, &file_name) {
        display_error(&error, &source);
        process::exit(1);
    }
}

fn run(cli: &Cli, source: &str, file_name: &str) -> Result<(), Error> {
    let start = Instant::now();

    let tokens = tokenize(source, Some(String::from(file_name)))?;
    println!("Tokenized in {:?}", start.elapsed());

    if cli.phase == Phase::Lex {
        if cli.dump {
            for token in &tokens {
                println!("{}", token);
            }
        }
        return Ok(());
    }

    let parse_start = Instant::now();
    let ast = parse(tokens, Rc::new(String::from(file_name)))?;
    println!("Parsed in {:?}", parse_start.elapsed());

    if cli.phase == Phase::Parse {
        if cli.dump {
            if let Some(root) = ast.root() {
                print!("{}", ast.dump(root));
            }
        }
        return Ok(());
    }

    let names_start = Instant::now();
    let definitions = check_names(&ast)?;
    println!("Resolved names in {:?}", names_start.elapsed());

    if cli.phase == Phase::Names {
        if cli.dump {
            for (reference, definition) in definitions.entries() {
                println!(
                    "{} {} -> {} {}",
                    reference,
                    ast.describe(reference),
                    definition,
                    ast.describe(*definition)
                );
            }
        }
        return Ok(());
    }

    let type_check_start = Instant::now();
    let types = type_check(&ast, &definitions)?;
    println!("Type checked in {:?}", type_check_start.elapsed());

    if cli.phase == Phase::Types {
        if cli.dump {
            for (id, ty) in types.entries() {
                println!("{} {}: {}", id, ast.describe(id), ty);
            }
        }
        return Ok(());
    }

    let frames_start = Instant::now();
    let mut labels = LabelGenerator::new();
    let layout = evaluate_frames(&ast, &definitions, &types, &mut labels)?;
    println!("Laid out frames in {:?}", frames_start.elapsed());

    if cli.phase == Phase::Frames {
        if cli.dump {
            dump_layout(&ast, &layout);
        }
        return Ok(());
    }

    let lower_start = Instant::now();
    let (_, chunks) = lower(&ast, &definitions, &types, &layout, labels)?;
    println!("Lowered in {:?}", lower_start.elapsed());
    println!("Total time: {:?}", start.elapsed());

    if cli.dump {
        for chunk in &chunks {
            print!("{}", chunk);
        }
    }

    Ok(())
}

fn dump_layout(ast: &Ast, layout: &Layout) {
    for (id, frame) in layout.frames.entries() {
        println!("{} {}: {}", id, ast.describe(id), frame);
    }
    for (id, access) in layout.accesses.entries() {
        println!("{} {}: {}", id, ast.describe(id), access);
    }
}
