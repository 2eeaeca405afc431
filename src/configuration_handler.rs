use std::path::PathBuf;

use clap::Parser;

use crate::{configuration::Configuration, validator::BookingRules};

/// Runtime configuration, taken from the command line with the database
/// URL also picked up from the environment or a `.env` file.
#[derive(Parser, Clone, Debug)]
#[command(name = "barber_shop", about = "Barber shop appointment service")]
pub struct ConfigurationHandler {
    /// Shop name shown by the frontend
    #[arg(long, default_value = "Barber Shop")]
    shop_name: String,

    /// Password for the admin dashboard endpoints
    #[arg(long, default_value = "123")]
    password: String,

    /// Static frontend served at /frontend
    #[arg(long, default_value = "../frontend/index.html")]
    frontend_path: PathBuf,

    /// Port to listen on
    #[arg(long, default_value = "3000")]
    port: String,

    /// First bookable hour of the day
    #[arg(long, default_value_t = 9)]
    opening_hour: u32,

    /// End of the working day, the last slot starts one hour earlier
    #[arg(long, default_value_t = 18)]
    closing_hour: u32,

    /// How many days ahead clients may book, at most ten years
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i64).range(1..=3650))]
    booking_horizon_days: i64,

    /// Postgres connection URL; without one the shop runs in memory
    #[arg(long)]
    database_url: Option<String>,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn shop_name(&self) -> String {
        self.shop_name.clone()
    }

    fn password(&self) -> String {
        self.password.clone()
    }

    fn frontend_path(&self) -> PathBuf {
        self.frontend_path.clone()
    }

    fn booking_rules(&self) -> BookingRules {
        BookingRules {
            opening_hour: self.opening_hour,
            closing_hour: self.closing_hour,
            horizon_days: self.booking_horizon_days,
        }
    }

    fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
    }

    fn port(&self) -> String {
        self.port.clone()
    }
}
