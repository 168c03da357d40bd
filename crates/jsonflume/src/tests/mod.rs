mod chunking;
mod coerce;
mod decode_bad;
mod encode;
