mod load;
pub mod setting;
pub use load::load;
pub use setting::Setting;
