//! Reusable Dioxus RSX components for the kiosk surfaces.

mod asset_loop;
mod demo_controls;
mod eta_readout;
mod likelihood_gauge;
mod rain_slider;
mod sensor_grid;
mod status_lamp;
mod toast_stack;

pub use asset_loop::AssetLoop;
pub use demo_controls::DemoControls;
pub use eta_readout::EtaReadout;
pub use likelihood_gauge::LikelihoodGauge;
pub use rain_slider::RainSlider;
pub use sensor_grid::SensorGrid;
pub use status_lamp::StatusLamp;
pub use toast_stack::ToastStack;
