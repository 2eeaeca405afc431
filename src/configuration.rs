use std::path::PathBuf;

use crate::validator::BookingRules;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn shop_name(&self) -> String;
    fn password(&self) -> String;
    fn frontend_path(&self) -> PathBuf;
    fn booking_rules(&self) -> BookingRules;
    fn database_url(&self) -> Option<String>;
    fn port(&self) -> String;
}
