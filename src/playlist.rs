use std::fmt;

use bytes::Bytes;

use crate::notice::Notifier;

/// One playlist entry. The audio payload is opaque to the playlist; it is
/// only handed back out when the track is played.
#[derive(Debug, Clone)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub audio: Bytes,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.artist)
    }
}

// Chain nodes live in an arena and link to each other by slot index, so the
// cursor can point into the middle of the chain without aliasing a node.
#[derive(Debug)]
struct Node {
    track: Track,
    next: Option<usize>,
}

/// A singly linked chain of tracks with a movable playback cursor.
///
/// `head` and `current` are handles into the node arena. `current` is either
/// none (empty playlist) or reachable from `head`; `length` always matches
/// the number of nodes reachable from `head`.
#[derive(Debug, Default)]
pub struct Playlist {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    current: Option<usize>,
    length: usize,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new track at the tail of the chain. The first track added
    /// to an empty playlist becomes both head and current track.
    pub fn add(&mut self, title: String, artist: String, audio: Bytes, notifier: &mut dyn Notifier) {
        let id = self.alloc(Track { title, artist, audio });

        match self.head {
            None => {
                self.head = Some(id);
                self.current = Some(id);
            }
            Some(head) => {
                let mut tail = head;
                while let Some(next) = self.node(tail).next {
                    tail = next;
                }
                self.node_mut(tail).next = Some(id);
            }
        }

        self.length += 1;
        notifier.success(&format!("Added: {}", self.node(id).track));
    }

    /// Walks the chain from head and renders one numbered entry per track.
    /// Recomputed fresh on every call; does not touch the cursor.
    pub fn display(&self) -> Vec<String> {
        let mut entries = Vec::with_capacity(self.length);
        let mut walk = self.head;
        let mut position = 1;

        while let Some(id) = walk {
            let node = self.node(id);
            entries.push(format!("{}. {}", position, node.track));
            walk = node.next;
            position += 1;
        }

        entries
    }

    /// Signals "now playing" and hands back the current track so the caller
    /// can route its audio to the playback surface. Warns and returns `None`
    /// when there is no current track.
    pub fn play_current(&self, notifier: &mut dyn Notifier) -> Option<Track> {
        match self.current {
            Some(id) => {
                let track = &self.node(id).track;
                notifier.info(&format!("Now playing: {}", track));
                Some(track.clone())
            }
            None => {
                notifier.warning("Playlist is empty or no song selected.");
                None
            }
        }
    }

    /// Moves the cursor to the next track. At the tail (or on an empty
    /// playlist) the cursor stays put and a warning is signaled.
    pub fn advance(&mut self, notifier: &mut dyn Notifier) {
        match self.current.and_then(|id| self.node(id).next) {
            Some(next) => self.current = Some(next),
            None => notifier.warning("End of playlist."),
        }
    }

    /// Moves the cursor to its predecessor, found by scanning from head.
    /// At the head (or on an empty playlist) the cursor stays put and a
    /// warning is signaled. A detached cursor is treated as "at head" so the
    /// predecessor scan can never run without a target.
    pub fn retreat(&mut self, notifier: &mut dyn Notifier) {
        let (Some(current), Some(head)) = (self.current, self.head) else {
            notifier.warning("Already at first song.");
            return;
        };
        if current == head {
            notifier.warning("Already at first song.");
            return;
        }

        let mut walk = head;
        while let Some(next) = self.node(walk).next {
            if next == current {
                self.current = Some(walk);
                return;
            }
            walk = next;
        }
    }

    /// Removes the first track (scanning from head) whose title matches
    /// exactly. Deleting the head resets the cursor to the new head no
    /// matter where it was; deleting any other node re-homes the cursor to
    /// the removed node's predecessor only when the cursor was on that node.
    pub fn delete(&mut self, title: &str, notifier: &mut dyn Notifier) {
        let Some(head) = self.head else {
            notifier.error("Playlist is empty.");
            return;
        };

        if self.node(head).track.title == title {
            let removed = self.release(head);
            self.head = removed.next;
            self.current = self.head;
            self.length -= 1;
            notifier.success(&format!("Deleted: {}", title));
            return;
        }

        let mut prev = head;
        let mut walk = self.node(head).next;
        while let Some(id) = walk {
            if self.node(id).track.title == title {
                let removed = self.release(id);
                self.node_mut(prev).next = removed.next;
                if self.current == Some(id) {
                    self.current = Some(prev);
                }
                self.length -= 1;
                notifier.success(&format!("Deleted: {}", title));
                return;
            }
            walk = self.node(id).next;
            prev = id;
        }

        notifier.error("Song not found.");
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.map(|id| &self.node(id).track)
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    fn alloc(&mut self, track: Track) -> usize {
        let node = Node { track, next: None };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: usize) -> Node {
        let node = self.nodes[id].take().expect("released a dead track slot");
        self.free.push(id);
        node
    }

    fn node(&self, id: usize) -> &Node {
        self.nodes[id].as_ref().expect("stale track handle")
    }

    fn node_mut(&mut self, id: usize) -> &mut Node {
        self.nodes[id].as_mut().expect("stale track handle")
    }
}
