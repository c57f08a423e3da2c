//! Interactive expression evaluator.
//!
//! Each input line is one of
//! + `set <name> <expression>`: Bind a variable to the expression's value.
//! + `vars`: List the bound variables.
//! + `exit` or `quit`: Leave.
//! + Anything else is evaluated as an expression.
//!
//! Logging is configured with the `RUST_LOG` environment variable.
use reckon_core::expr::{Engine, Function};
use std::io::{self, BufRead, Write};

fn main() -> io::Result<()> {
    #[cfg(feature = "tracing")]
    logging::enable();

    let mut engine = Engine::new();
    if let Err(err) = engine.register_functions(builtins()) {
        #[cfg(feature = "tracing")]
        tracing::error!(?err, "could not register builtin functions");
        eprintln!("{err}");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut user_in = String::new();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        user_in.clear();
        if stdin.lock().read_line(&mut user_in)? == 0 {
            return Ok(());
        }

        let Some(cmd) = parse_user_input_to_command(&user_in) else {
            writeln!(stdout, "invalid command")?;
            continue;
        };

        match cmd {
            Command::Empty => {}
            Command::Exit => return Ok(()),
            Command::Vars => {
                let mut vars = engine
                    .symbols()
                    .iter()
                    .filter_map(|(name, entry)| entry.as_variable().map(|value| (name, value)))
                    .collect::<Vec<_>>();
                vars.sort_by(|(a, _), (b, _)| a.cmp(b));
                for (name, value) in vars {
                    writeln!(stdout, "{name} = {value}")?;
                }
            }
            Command::Set { name, expr } => {
                match engine
                    .evaluate(expr)
                    .and_then(|value| engine.bind_variable(name, value).map(|_| value))
                {
                    Ok(value) => writeln!(stdout, "{name} = {value}")?,
                    Err(err) => writeln!(stdout, "error: {err}")?,
                }
            }
            Command::Eval(expr) => match engine.evaluate(expr) {
                Ok(value) => writeln!(stdout, "{value}")?,
                Err(err) => writeln!(stdout, "error: {err}")?,
            },
        }
    }
}

#[derive(Debug, PartialEq)]
enum Command<'a> {
    Empty,
    Exit,
    Vars,
    Set { name: &'a str, expr: &'a str },
    Eval(&'a str),
}

/// `None` if the input is an invalid command.
fn parse_user_input_to_command(input: &str) -> Option<Command<'_>> {
    let input = input.trim();
    let (cmd, rest) = input
        .split_once(char::is_whitespace)
        .map(|(cmd, rest)| (cmd, rest.trim()))
        .unwrap_or((input, ""));

    match cmd {
        "" => Some(Command::Empty),
        "exit" | "quit" if rest.is_empty() => Some(Command::Exit),
        "vars" if rest.is_empty() => Some(Command::Vars),
        "set" => {
            let (name, expr) = rest.split_once(char::is_whitespace)?;
            let expr = expr.trim();
            if expr.is_empty() {
                return None;
            }
            Some(Command::Set { name, expr })
        }
        _ => Some(Command::Eval(input)),
    }
}

fn builtins() -> Vec<(&'static str, Function)> {
    vec![
        ("sqrt", Function::new(f64::sqrt)),
        ("abs", Function::new(f64::abs)),
        ("ln", Function::new(f64::ln)),
        ("sin", Function::new(f64::sin)),
        ("cos", Function::new(f64::cos)),
        ("tan", Function::new(f64::tan)),
        ("max", Function::new(f64::max)),
        ("min", Function::new(f64::min)),
    ]
}

#[cfg(feature = "tracing")]
mod logging {
    use std::io;
    use tracing_subscriber::{
        EnvFilter, Registry,
        fmt::{self, time::UtcTime},
        prelude::*,
    };

    /// Enable logging.
    pub fn enable() {
        let console_logger = fmt::layer()
            .with_writer(io::stderr)
            .with_timer(UtcTime::rfc_3339())
            .pretty();

        let subscriber = Registry::default()
            .with(EnvFilter::from_default_env())
            .with(console_logger);

        if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("could not enable logging: {err}");
        }
    }
}
