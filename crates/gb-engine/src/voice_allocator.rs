//! VoiceAllocator: polyphony ceiling and mute-group exclusivity.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;

use crate::sink::{AudioSink, VoiceHandle, VoiceRequest};

/// What triggered a voice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceSource {
    /// A kit drum pad
    Pad(u16),
    /// The kit's bass tone
    Bass,
}

/// A voice waiting to be admitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewVoice {
    pub request: VoiceRequest,
    pub source: VoiceSource,
    pub mute_group: Option<u8>,
}

/// Bookkeeping for one sounding voice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LiveVoice {
    handle: VoiceHandle,
    mute_group: Option<u8>,
}

/// Tracks every live voice, oldest first.
///
/// All membership changes go through `&mut self`, so the live set and the
/// group table never disagree.
pub struct VoiceAllocator {
    live: VecDeque<LiveVoice>,
    groups: BTreeMap<u8, Vec<VoiceHandle>>,
    max_voices: usize,
}

impl VoiceAllocator {
    /// Create an allocator allowing at most `max_voices` live voices.
    pub fn new(max_voices: usize) -> Self {
        Self {
            live: VecDeque::with_capacity(max_voices + 1),
            groups: BTreeMap::new(),
            max_voices: max_voices.max(1),
        }
    }

    /// Start a voice on `sink`.
    ///
    /// Stops every live voice in the new voice's mute group, then evicts the
    /// oldest voice if the ceiling is reached, then schedules. Returns `None`
    /// if the sink refused the voice.
    pub fn admit<S: AudioSink + ?Sized>(&mut self, sink: &mut S, voice: NewVoice) -> Option<VoiceHandle> {
        if let Some(group) = voice.mute_group {
            self.stop_group(sink, group);
        }
        while self.live.len() >= self.max_voices {
            let Some(oldest) = self.live.front().map(|v| v.handle) else {
                break;
            };
            log::trace!("evicting voice {:?}", oldest);
            sink.stop_voice(oldest);
            self.forget(oldest);
        }

        let handle = sink.schedule_voice(&voice.request)?;
        self.live.push_back(LiveVoice {
            handle,
            mute_group: voice.mute_group,
        });
        if let Some(group) = voice.mute_group {
            self.groups.entry(group).or_default().push(handle);
        }
        Some(handle)
    }

    /// Drop a voice that ended on its own. Unknown handles are ignored.
    pub fn release(&mut self, handle: VoiceHandle) {
        self.forget(handle);
    }

    /// Stop and forget every live voice in `group`.
    pub fn stop_group<S: AudioSink + ?Sized>(&mut self, sink: &mut S, group: u8) {
        let Some(members) = self.groups.remove(&group) else {
            return;
        };
        for handle in members {
            sink.stop_voice(handle);
            if let Some(pos) = self.live.iter().position(|v| v.handle == handle) {
                self.live.remove(pos);
            }
        }
    }

    /// Stop and forget every live voice.
    pub fn stop_all<S: AudioSink + ?Sized>(&mut self, sink: &mut S) {
        for voice in self.live.drain(..) {
            sink.stop_voice(voice.handle);
        }
        self.groups.clear();
    }

    /// Number of live voices.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of live voices in `group`.
    pub fn group_count(&self, group: u8) -> usize {
        self.groups.get(&group).map_or(0, Vec::len)
    }

    pub fn contains(&self, handle: VoiceHandle) -> bool {
        self.live.iter().any(|v| v.handle == handle)
    }

    pub fn max_voices(&self) -> usize {
        self.max_voices
    }

    fn forget(&mut self, handle: VoiceHandle) {
        let Some(pos) = self.live.iter().position(|v| v.handle == handle) else {
            return;
        };
        let Some(voice) = self.live.remove(pos) else {
            return;
        };
        if let Some(group) = voice.mute_group {
            if let Some(members) = self.groups.get_mut(&group) {
                members.retain(|h| *h != handle);
                if members.is_empty() {
                    self.groups.remove(&group);
                }
            }
        }
    }
}
