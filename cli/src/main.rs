use clap::{Args, Parser, Subcommand, ValueEnum};
use crossbeam_channel::bounded;
use linux_embedded_hal::{Delay, I2cdev};
use sources::{Location, WeatherSource};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use ui::{FeedMode, Module, ModuleKind, Navigator, Shutdown, StreamDisplay, SystemClock, Timing};

mod display;
use display::{CharLcdPlate, PLATE_ADDRESS};

// Raspberry pi I2C bus on the GPIO header
const I2C_BUS: &str = "/dev/i2c-1";
const SENSOR_COMMAND: &str = "read_dht11";

#[derive(Parser)]
#[command(version, about = "Clock, weather and sensor panes for an RGB 16x2 LCD plate")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// I2C bus device the LCD plate is attached to
    #[arg(long, global = true, default_value = I2C_BUS)]
    i2c_bus: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,

    /// Options for `menu` when no subcommand is given
    #[command(flatten)]
    menu: MenuArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Cycle through the panes with the keypad
    Menu(MenuArgs),
    /// Show lines read from standard input
    Stream {
        /// Read two lines at a time and show them together
        #[arg(short = '2', long)]
        pairs: bool,
    },
    /// Print the current weather to standard output periodically
    Weather {
        #[command(flatten)]
        location: LocationArgs,

        /// Seconds between fetches
        #[arg(long, default_value_t = 60)]
        interval: u64,
    },
}

#[derive(Args)]
struct MenuArgs {
    #[command(flatten)]
    location: LocationArgs,

    /// IANA timezone for the clock, defaults to the system timezone
    #[arg(long)]
    timezone: Option<chrono_tz::Tz>,

    /// Pane shown at startup
    #[arg(long, value_enum, default_value_t = StartModule::Quick)]
    start: StartModule,

    /// Program that prints the DHT11 temperature and humidity
    #[arg(long, default_value = SENSOR_COMMAND)]
    sensor_command: PathBuf,
}

#[derive(Args)]
struct LocationArgs {
    #[arg(long, allow_negative_numbers = true, default_value_t = Location::default().longitude)]
    lon: f64,

    #[arg(long, allow_negative_numbers = true, default_value_t = Location::default().latitude)]
    lat: f64,
}

impl From<LocationArgs> for Location {
    fn from(args: LocationArgs) -> Self {
        Location {
            longitude: args.lon,
            latitude: args.lat,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StartModule {
    Clock,
    ClockCoarse,
    Weather,
    Ambient,
    Quick,
}

impl From<StartModule> for ModuleKind {
    fn from(start: StartModule) -> Self {
        match start {
            StartModule::Clock => ModuleKind::Clock,
            StartModule::ClockCoarse => ModuleKind::ClockCoarse,
            StartModule::Weather => ModuleKind::Weather,
            StartModule::Ambient => ModuleKind::Ambient,
            StartModule::Quick => ModuleKind::Quick,
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();
}

fn open_plate(bus: &Path) -> Result<CharLcdPlate<I2cdev, Delay>, Box<dyn Error>> {
    info!(bus = %bus.display(), "Initializing LCD");
    let i2c = I2cdev::new(bus)?;
    let mut plate = CharLcdPlate::new(i2c, Delay, PLATE_ADDRESS);
    plate.init()?;
    Ok(plate)
}

fn run_menu(bus: &Path, args: MenuArgs, shutdown: &Shutdown) -> Result<(), Box<dyn Error>> {
    let clock = match args.timezone {
        Some(timezone) => SystemClock::in_timezone(timezone),
        None => SystemClock::local(),
    };
    let location = Location::from(args.location);
    let modules = vec![
        Module::clock(),
        Module::clock_coarse(),
        Module::weather(Box::new(sources::weather_service()?), location),
        Module::ambient(Box::new(sources::sensor_command(&args.sensor_command))),
        Module::quick(
            Box::new(sources::sensor_command(&args.sensor_command)),
            Box::new(sources::weather_service()?),
            location,
        ),
    ];

    let plate = open_plate(bus)?;
    let mut navigator =
        Navigator::new(plate, clock, modules, Timing::default()).starting_at(args.start.into());
    navigator.run(shutdown)?;
    Ok(())
}

fn run_stream(bus: &Path, pairs: bool, shutdown: &Shutdown) -> Result<(), Box<dyn Error>> {
    let mode = if pairs {
        FeedMode::Pairs
    } else {
        FeedMode::Scroll
    };
    let (line_tx, line_rx) = bounded(16);

    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(%err, "Unable to read standard input");
                    break;
                }
            }
        }
    });

    let mut stream = StreamDisplay::new(open_plate(bus)?, mode);
    stream.run(&line_rx, shutdown)?;
    Ok(())
}

fn run_weather(
    location: Location,
    interval: Duration,
    shutdown: &Shutdown,
) -> Result<(), Box<dyn Error>> {
    let mut service = sources::weather_service()?;
    loop {
        match service.current(&location) {
            Ok(weather) => {
                println!("{}°F {}°C", weather.temp_f, weather.temp_c);
                println!("{}", weather.condition);
            }
            Err(err) => warn!(%err, "Weather unavailable"),
        }
        if shutdown.wait(interval) {
            return Ok(());
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();

    let shutdown = Shutdown::new();
    let handle = shutdown.clone();
    ctrlc::set_handler(move || {
        info!("Received termination signal");
        handle.request();
    })?;

    match cli.command.unwrap_or(Command::Menu(cli.menu)) {
        Command::Menu(args) => run_menu(&cli.i2c_bus, args, &shutdown)?,
        Command::Stream { pairs } => run_stream(&cli.i2c_bus, pairs, &shutdown)?,
        Command::Weather { location, interval } => {
            run_weather(location.into(), Duration::from_secs(interval), &shutdown)?
        }
    }

    info!("Exiting");
    Ok(())
}
