//! Operator interconnection.
//!
//! Each channel carries an [`Algorithm`] tag. When a register write changes
//! connection bits, 4-op pairing or rhythm mode, the chip resolves the tag's
//! [`Topology`] into per-operator [`ModSource`]s and per-channel output taps.
//! The sample loop only evaluates the resolved wiring.

use crate::channel::ChannelType;

/// Modulation input of an operator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ModSource {
    /// No phase modulation.
    #[default]
    None,
    /// The operator's own feedback.
    Feedback,
    /// Output of another operator.
    Operator(usize),
}

/// Connection topology of a channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// 2-op serial: op1 modulates op2.
    #[default]
    Fm,
    /// 2-op parallel: both operators audible.
    Am,
    /// 4-op serial chain.
    FmFm,
    /// 4-op: two serial pairs, both audible.
    FmAm,
    /// 4-op: op1 audible, ops 2-4 serial.
    AmFm,
    /// 4-op: op1, ops 2-3 serial, op4 audible.
    AmAm,
    /// Lower half of a 4-op pair; wiring is owned by the upper channel.
    Merged,
}

impl Algorithm {
    /// 2-op algorithm from the connection bit.
    pub fn two_op(connection: bool) -> Self {
        if connection {
            Self::Am
        } else {
            Self::Fm
        }
    }

    /// 4-op algorithm from the lower and upper channels' connection bits.
    pub fn four_op(lower: bool, upper: bool) -> Self {
        match (lower, upper) {
            (false, false) => Self::FmFm,
            (false, true) => Self::FmAm,
            (true, false) => Self::AmFm,
            (true, true) => Self::AmAm,
        }
    }

    /// Whether this is one of the combined 4-op topologies.
    pub fn is_four_op(self) -> bool {
        matches!(self, Self::FmFm | Self::FmAm | Self::AmFm | Self::AmAm)
    }

    /// Number of operators contributing to the output.
    pub fn carriers(self) -> usize {
        match self {
            Self::Fm | Self::FmFm => 1,
            Self::Am | Self::FmAm | Self::AmFm => 2,
            Self::AmAm => 3,
            Self::Merged => 0,
        }
    }
}

/// Operator position relative to the channel being wired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node {
    /// The channel's own operator 0 or 1.
    Own(usize),
    /// The pair channel's operator 0 or 1.
    Pair(usize),
}

/// Source expressed in channel-relative terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// Silence.
    Silent,
    /// The target's own feedback.
    Feedback,
    /// Output of another operator.
    Output(Node),
}

/// Wiring for one topology.
#[derive(Clone, Copy, Debug)]
pub struct Topology {
    /// Modulation input per operator.
    pub modulation: &'static [(Node, Source)],
    /// Output taps; `None` leaves the current taps in place.
    pub taps: Option<&'static [Node]>,
    /// Whether the pair channel's taps are cleared.
    pub clear_pair_taps: bool,
}

use Node::{Own, Pair};
use Source::{Feedback, Output, Silent};

const FM: Topology = Topology {
    modulation: &[(Own(0), Feedback), (Own(1), Output(Own(0)))],
    taps: Some(&[Own(1)]),
    clear_pair_taps: false,
};

const AM: Topology = Topology {
    modulation: &[(Own(0), Feedback), (Own(1), Silent)],
    taps: Some(&[Own(0), Own(1)]),
    clear_pair_taps: false,
};

const FM_FM: Topology = Topology {
    modulation: &[
        (Pair(0), Feedback),
        (Pair(1), Output(Pair(0))),
        (Own(0), Output(Pair(1))),
        (Own(1), Output(Own(0))),
    ],
    taps: Some(&[Own(1)]),
    clear_pair_taps: true,
};

const FM_AM: Topology = Topology {
    modulation: &[
        (Pair(0), Feedback),
        (Pair(1), Output(Pair(0))),
        (Own(0), Silent),
        (Own(1), Output(Own(0))),
    ],
    taps: Some(&[Pair(1), Own(1)]),
    clear_pair_taps: true,
};

const AM_FM: Topology = Topology {
    modulation: &[
        (Pair(0), Feedback),
        (Pair(1), Silent),
        (Own(0), Output(Pair(1))),
        (Own(1), Output(Own(0))),
    ],
    taps: Some(&[Pair(0), Own(1)]),
    clear_pair_taps: true,
};

const AM_AM: Topology = Topology {
    modulation: &[
        (Pair(0), Feedback),
        (Pair(1), Silent),
        (Own(0), Output(Pair(1))),
        (Own(1), Silent),
    ],
    taps: Some(&[Pair(0), Own(0), Own(1)]),
    clear_pair_taps: true,
};

// Rhythm channels keep the taps installed by the rhythm register.
const BASS_DRUM_FM: Topology = Topology {
    modulation: &[(Own(0), Feedback), (Own(1), Output(Own(0)))],
    taps: None,
    clear_pair_taps: false,
};

const BASS_DRUM_AM: Topology = Topology {
    modulation: &[(Own(0), Feedback), (Own(1), Silent)],
    taps: None,
    clear_pair_taps: false,
};

const PERCUSSION: Topology = Topology {
    modulation: &[(Own(0), Silent), (Own(1), Silent)],
    taps: None,
    clear_pair_taps: false,
};

/// Wiring for a channel, or `None` when the channel is wired by its pair.
///
/// `channel` selects between the bass drum (6) and the two percussion
/// channels when `kind` is [`ChannelType::Drum`].
pub fn topology(kind: ChannelType, algorithm: Algorithm, channel: usize) -> Option<Topology> {
    if kind == ChannelType::Drum {
        return Some(match (channel % 9, algorithm) {
            (6, Algorithm::Am) => BASS_DRUM_AM,
            (6, _) => BASS_DRUM_FM,
            _ => PERCUSSION,
        });
    }
    match algorithm {
        Algorithm::Merged => None,
        Algorithm::Fm => Some(FM),
        Algorithm::Am => Some(AM),
        Algorithm::FmFm => Some(FM_FM),
        Algorithm::FmAm => Some(FM_AM),
        Algorithm::AmFm => Some(AM_FM),
        Algorithm::AmAm => Some(AM_AM),
    }
}
