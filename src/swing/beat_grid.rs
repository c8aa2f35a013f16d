/// A note's duration split at the beat boundaries it crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeatComponents {
    /// From the note's start up to the first beat boundary.
    pub pre: u64,
    /// From the first to the last boundary the note covers.
    pub interior: u64,
    /// From the last boundary to the note's end.
    pub post: u64,
}

impl BeatComponents {
    pub fn total(&self) -> u64 {
        self.pre + self.interior + self.post
    }
}

/// Split `duration`, starting at `start`, at the beats of a grid of width `divisions`.
///
/// Some examples with `divisions = 8`, using 0, 1 and 2 for `pre`, `interior`
/// and `post`:
///
/// ```text
/// start duration   1       2       3       4          result
///                  |       |       |       |       |
///   0     4        2222                                 [ 0  0 4 ]
///   4     8            00002222                         [ 4  0 4 ]
///  12     2                    11                       [ 0  2 0 ]
///  14     2                      00                     [ 2  0 0 ]
///  16    12                        111111112222         [ 0  8 4 ]
///   4    24           000011111111111111112222         [ 4 16 4 ]
/// ```
///
/// `pre` is only set when the note does not start on a beat and reaches the
/// next one; `post` only when the note does not end on a beat and started
/// before that beat. A note strictly inside a single beat is all `interior`.
pub fn decompose(divisions: u32, start: u64, duration: u32) -> BeatComponents {
    let divisions = u64::from(divisions);
    let duration = u64::from(duration);

    let beat_to_start = start % divisions;
    let mut pre = if beat_to_start == 0 {
        0
    } else {
        divisions - beat_to_start
    };
    if pre > duration {
        pre = 0;
    }

    let mut post = (start + duration) % divisions;
    if post > duration {
        post = 0;
    }

    BeatComponents {
        pre,
        interior: duration - pre - post,
        post,
    }
}
