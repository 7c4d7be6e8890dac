//! Input-fetch pipeline for the first convolution layer.
//!
//! Two synchronous units paired as producer and consumer:
//!
//! ```text
//! ┌──────────────────────┐  addr  ┌──────────────┐  request   ┌────────────┐
//! │ PixelAddressGenerator│───────►│ WindowReader │───────────►│ banked     │
//! │ (raster walk, dwell) │        │ (decode +    │            │ memory     │
//! └──────────────────────┘        │  recombine)  │◄───────────│ (1 cycle)  │
//!          ▲                      └──────┬───────┘  response  └────────────┘
//!    start │ advance                     ▼
//!          │                        out0 / out1
//! ```
//!
//! The generator owns the scan position and presents one address at a
//! time. The reader turns each address into a two-word fetch and splices
//! the returned words into the overlapping output pair one cycle later.
//! Both units update exactly once per clock edge.

pub mod decode;
pub mod generator;
pub mod reader;

pub use decode::{block_index, byte_select, channel_request, phase};
pub use generator::{PixelAddressGenerator, ScanPosition};
pub use reader::{WindowPair, WindowReader};
