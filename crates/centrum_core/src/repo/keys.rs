//! Cache key names shared by every consumer of the durable cache.

use crate::model::module::ModuleId;

pub const SESSION_TOKEN_KEY: &str = "sessionToken";
pub const PREF_COLORS_KEY: &str = "prefColors";
pub const DARK_MODE_KEY: &str = "darkMode";

/// Cache partition key for one module's record snapshot.
pub fn module_data_key(module: ModuleId) -> String {
    format!("moduleData-{module}")
}
