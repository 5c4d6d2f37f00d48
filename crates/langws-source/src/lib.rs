mod location;
mod path;

pub use location::Location;
pub use location::LocationError;
pub use path::clean_utf8_path;
