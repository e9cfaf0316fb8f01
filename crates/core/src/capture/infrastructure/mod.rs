pub mod image_file_reader;
pub mod still_frame_source;
