//! Byte-level helpers shared by the tables stream codec and the heaps.

pub mod io;
