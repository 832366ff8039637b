pub mod decode;
pub mod line_dumper;
