use clap::{Parser, Subcommand};
use engfmt::prefs::{self, PreferenceUpdate, Setting};
use engfmt::quantity::{self, check_precision, Quantity, QuantitySummary};
use std::io::Read;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "engfmt")]
#[command(about = "Read and write physical quantities in engineering notation", long_about = None)]
struct Cli {
    /// Preferences file (TOML)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Digits after the first in engineering output
    #[arg(long, global = true)]
    prec: Option<i64>,

    /// Text between the number and its scale factor or units
    #[arg(long, global = true)]
    spacer: Option<String>,

    /// Scale factor used between 1 and 1000
    #[arg(long, global = true)]
    unity: Option<String>,

    /// Scale factors allowed in output (e.g. "TGMkmunpfa")
    #[arg(long, global = true)]
    output: Option<String>,

    /// Treat scale-factor letters as units when reading
    #[arg(long, global = true)]
    ignore_sf: bool,

    /// Log debug messages to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print quantities in engineering notation
    Eng {
        #[arg(required = true, allow_hyphen_values = true)]
        quantities: Vec<String>,

        /// Units to assume when a quantity has none
        #[arg(short, long)]
        units: Option<String>,
    },

    /// Print quantities in scientific notation
    Sci {
        #[arg(required = true, allow_hyphen_values = true)]
        quantities: Vec<String>,
    },

    /// Print the value of each quantity as a float
    Float {
        #[arg(required = true, allow_hyphen_values = true)]
        quantities: Vec<String>,
    },

    /// Print each quantity without its units, number as written
    Strip {
        #[arg(required = true, allow_hyphen_values = true)]
        quantities: Vec<String>,
    },

    /// Print the decomposition of each quantity as JSON
    Inspect {
        #[arg(required = true, allow_hyphen_values = true)]
        quantities: Vec<String>,
    },

    /// Render quantities with a format specification (e.g. ".8q", ">12r", "e")
    Format {
        spec: String,

        #[arg(required = true, allow_hyphen_values = true)]
        quantities: Vec<String>,
    },

    /// Convert floating-point quantities in text to engineering notation
    ToEng {
        /// Input file (default: stdin)
        file: Option<String>,
    },

    /// Convert engineering-notation quantities in text to floating point
    FromEng {
        /// Input file (default: stdin)
        file: Option<String>,
    },

    /// Show a named physical constant
    Constant {
        /// Constant name (e.g. "h", "eps0")
        name: String,
    },

    /// Read `name = value -- description` lines and print them
    Assign {
        /// Input file (default: stdin)
        file: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = apply_preferences(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Eng { quantities, units } => print_engineering(&quantities, units.as_deref()),
        Commands::Sci { quantities } => print_each(&quantities, |q| q.to_scientific(None)),
        Commands::Float { quantities } => print_each(&quantities, |q| q.to_float().to_string()),
        Commands::Strip { quantities } => print_each(&quantities, Quantity::to_raw_string),
        Commands::Inspect { quantities } => inspect(&quantities),
        Commands::Format { spec, quantities } => print_each(&quantities, |q| q.format(&spec)),
        Commands::ToEng { file } => {
            read_input(file.as_deref()).map(|text| print!("{}", quantity::all_to_eng(&text)))
        }
        Commands::FromEng { file } => {
            read_input(file.as_deref()).map(|text| print!("{}", quantity::all_from_eng(&text)))
        }
        Commands::Constant { name } => show_constant(&name),
        Commands::Assign { file } => print_assignments(file.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Config file first, then command-line overrides.
fn apply_preferences(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &cli.config {
        prefs::load_preferences(path)?;
    }

    let human_precision = match cli.prec {
        Some(prec) => Setting::Set(check_precision(prec)?),
        None => Setting::Keep,
    };
    prefs::set_preferences(PreferenceUpdate {
        human_precision,
        spacer: cli.spacer.clone().into(),
        unity_scale_factor: cli.unity.clone().into(),
        output_scale_factors: cli.output.clone().into(),
        ignore_scale_factors: cli.ignore_sf.then_some(true).into(),
        ..Default::default()
    });
    Ok(())
}

fn print_engineering(
    quantities: &[String],
    units: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    for text in quantities {
        let q = Quantity::parse(text, units, None)?;
        println!("{}", q);
    }
    Ok(())
}

fn print_each(
    quantities: &[String],
    render: impl Fn(&Quantity) -> String,
) -> Result<(), Box<dyn std::error::Error>> {
    for text in quantities {
        let q: Quantity = text.parse()?;
        println!("{}", render(&q));
    }
    Ok(())
}

fn inspect(quantities: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let summaries = quantities
        .iter()
        .map(|text| text.parse::<Quantity>().map(|q| q.summary()))
        .collect::<Result<Vec<QuantitySummary>, _>>()?;
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}

fn show_constant(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let constant = quantity::find_constant(name)
        .ok_or_else(|| quantity::QuantityError::UnknownConstant(name.to_string()))?;
    let q = Quantity::from_value(constant.value, Some(constant.units)).with_name(constant.name);
    println!("{} -- {}", q.format("Q"), constant.description);
    Ok(())
}

fn print_assignments(file: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(file)?;
    let assignments = quantity::parse_assignments(&text)?;

    let mut names: Vec<&String> = assignments.keys().collect();
    names.sort();
    for name in names {
        let q = &assignments[name];
        match q.description() {
            Some(desc) => println!("{} -- {}", q.format("Q"), desc),
            None => println!("{}", q.format("Q")),
        }
    }
    Ok(())
}

fn read_input(file: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
