use std::{env, fs, io, path::Path};

use tracing::debug;

use fardthon::frontend::decode::{encode_header, encode_text};
use fardthon::frontend::line_dumper::LineDumper;
use fardthon::lang::header::Header;
use fardthon::lang::program::Program;
use fardthon::runtime::{InterpConfig, Interpreter};

/// Flags that consume the following argument.
const VALUE_FLAGS: [&str; 2] = ["--max-steps", "--encode"];

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--help".to_string()) || args.contains(&"-h".to_string()) {
        print_usage();
        return;
    }

    if let Some(text) = flag_value(&args, "--encode") {
        print_encoded(text);
        return;
    }

    let lines_only = args.contains(&"--lines".to_string());
    let no_color = args.contains(&"--no-color".to_string());
    let pretty = args.contains(&"--pretty".to_string());
    let compile = args.contains(&"--compile".to_string());

    let config = InterpConfig {
        max_steps: flag_value(&args, "--max-steps").map(|n| match n.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Error: --max-steps expects a number, got {}", n);
                std::process::exit(1);
            }
        }),
        ..InterpConfig::default()
    };

    match filename(&args) {
        Some(filename) => {
            let program = load_program(filename);
            debug!(file = %filename, lines = program.len(), "loaded");

            if lines_only {
                dump_lines(&program, no_color, pretty);
            } else if compile {
                compile_program(&program, filename);
            } else {
                run_program(&program, config);
            }
        }
        None => print_usage(),
    }
}

/// Logging goes to stderr and is off unless `RUST_LOG` is set, so program
/// output on stdout stays clean.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

// first argument that is neither a flag nor a flag's value
fn filename(args: &[String]) -> Option<&str> {
    args.iter()
        .enumerate()
        .skip(1)
        .find(|&(i, a)| !a.starts_with('-') && !VALUE_FLAGS.contains(&args[i - 1].as_str()))
        .map(|(_, a)| a.as_str())
}

fn load_program(filename: &str) -> Program {
    let path = Path::new(filename);
    match path.extension().and_then(|e| e.to_str()) {
        Some("fard") => match fs::read_to_string(path) {
            Ok(source) => Program::from_source(&source),
            Err(e) => {
                eprintln!("Failed to read '{}': {}", filename, e);
                std::process::exit(1);
            }
        },
        Some("fardc") => {
            let bytes = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    eprintln!("Failed to read '{}': {}", filename, e);
                    std::process::exit(1);
                }
            };
            match Program::from_image(&bytes) {
                Ok(program) => program,
                Err(e) => {
                    eprintln!("Image error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("Error: expected a .fard or .fardc file, got {}", filename);
            std::process::exit(1);
        }
    }
}

fn dump_lines(program: &Program, no_color: bool, pretty: bool) {
    let mut dumper = LineDumper::new();

    if no_color {
        dumper = dumper.no_color();
    }
    if pretty {
        dumper = dumper.pretty();
    }

    if let Err(e) = dumper.dump(&mut io::stdout().lock(), &program.lines) {
        eprintln!("Failed to write listing: {}", e);
        std::process::exit(1);
    }
}

fn compile_program(program: &Program, filename: &str) {
    let out_path = Path::new(filename).with_extension("fardc");

    let image = match program.to_image() {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Image error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = fs::write(&out_path, image) {
        eprintln!("Failed to write '{}': {}", out_path.display(), e);
        std::process::exit(1);
    }
    println!("wrote {}", out_path.display());
}

fn run_program(program: &Program, config: InterpConfig) {
    // stdout is line buffered, so every printed line is out before a
    // later failure.
    let mut interp = Interpreter::with_config(io::stdout().lock(), config);

    if let Err(e) = interp.run(program) {
        eprintln!("Runtime error: {}", e);
        if let Some(line) = e.line().and_then(|n| program.lines.iter().find(|l| l.number == n)) {
            eprintln!("  --> {:>4} | {}", line.number, line.text.trim());
        }
        std::process::exit(1);
    }
    debug!(steps = interp.steps(), "finished");
}

/// Print a program that prints `text`.
fn print_encoded(text: &str) {
    match encode_text(text) {
        Ok(data) => {
            println!("{}", encode_header(Header::Print));
            println!("{}", encode_header(Header::Ascii));
            println!("{}", data);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("FARDTHON - an esoteric language written in four letters");
    println!();
    println!("Usage:");
    println!("  fardthon <file.fard>             Run a program");
    println!("  fardthon <file.fardc>            Run a compiled image");
    println!("  fardthon --lines <file>          Show line classifications");
    println!("      --pretty                     ...with decoded numbers for data lines");
    println!("      --no-color                   ...without ANSI colors");
    println!("  fardthon --compile <file.fard>   Write <file>.fardc");
    println!("  fardthon --encode <text>         Print a program that prints <text>");
    println!("  fardthon --max-steps <n> <file>  Stop after n steps");
    println!("  fardthon --help, -h              Show this help");
}
