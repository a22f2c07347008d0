pub mod chained_decoder;
pub mod decode_worker;
pub mod decoder_factory;
mod luma;
pub mod rqrr_decoder;
pub mod rxing_decoder;
