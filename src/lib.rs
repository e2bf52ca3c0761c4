// Library for tests to access modules

pub mod config;
pub mod gpu;
pub mod graph;
pub mod models;
pub mod redraw;
pub mod render_loop;
pub mod sampler;
pub mod series;
pub mod state;
pub mod surface;
pub mod telemetry_repo;
pub mod texture;
pub mod widgets;
