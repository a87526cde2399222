//! Bundling a `Parser` and a `Dumper` over one transport.
//!
//! The original `Connection` (`include/http/connection.h`) owns one
//! `Parser` reading from a live `TCPSocket` and one `Dumper` writing to it,
//! backed by two separate `Stream` buffer objects (`Stream streams_[2]`) —
//! wiring that `spec.md` §1 puts out of scope for this crate's core
//! ("Connection is external"). `Connection` here keeps that shape, minus
//! the socket: it pairs a `Parser<R, _>` and a `Dumper<W, _>` constructed
//! from whatever read/write halves the caller supplies, so tests and demos
//! don't need to hand-wire the two separately.

use crate::dumper::Dumper;
use crate::error::Result;
use crate::parser::{Parser, ParserConfig};
use crate::stream::Stream;

/// A `Parser` and a `Dumper` over independent read/write transports,
/// mirroring the original's split input/output `Stream` pair.
pub struct Connection<R, RF, W, WF> {
    pub parser: Parser<R, RF>,
    pub dumper: Dumper<W, WF>,
}

impl<R, RF, W, WF> Connection<R, RF, W, WF>
where
    R: Stream,
    RF: FnMut(&mut R) -> Result<()>,
    W: Stream,
    WF: FnMut(&mut W) -> Result<()>,
{
    pub fn new(read_stream: R, refill: RF, write_stream: W, drain: WF, config: ParserConfig) -> Self {
        Connection {
            parser: Parser::new(read_stream, refill, config),
            dumper: Dumper::new(write_stream, drain),
        }
    }
}
