pub mod png_writer;

pub use png_writer::save_png;
