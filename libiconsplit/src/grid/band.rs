/// A maximal run of rows (or columns) that contain ink, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Band {
    /// first index of the run
    pub start: u32,
    /// last index of the run
    pub end: u32,
}

impl Band {
    /// Indexes covered by the band, first to last
    pub fn indexes(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BandState {
    Outside,
    InsideBand { start: u32 },
}

/// Splits a sequence of per-row (or per-column) "has ink" flags into bands
///
/// A band opens on the first ink entry after a gap and closes on the first entry without ink.
/// A band still open when the sequence ends closes at the last entry.
pub fn find_bands(has_ink: impl IntoIterator<Item = bool>) -> Vec<Band> {
    let mut bands = Vec::new();
    let mut state = BandState::Outside;
    let mut last = None;

    for (index, ink) in (0u32..).zip(has_ink) {
        state = match (state, ink) {
            (BandState::Outside, true) => BandState::InsideBand { start: index },
            (BandState::InsideBand { start }, false) => {
                bands.push(Band {
                    start,
                    end: index - 1,
                });
                BandState::Outside
            }
            (state, _) => state,
        };
        last = Some(index);
    }

    if let (BandState::InsideBand { start }, Some(end)) = (state, last) {
        bands.push(Band { start, end });
    }
    bands
}
