// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! A stable-slot-id pushdown (spec §9 "iterator stability in pushdowns").
//!
//! Both the LR driver and the LL driver grow and shrink a pair of these in
//! lockstep, always at the front. What makes it more than a `Vec<T>` is
//! that the attribute-routing step records a slot id the moment a rule
//! expands its output pattern, then writes through that id later, after
//! unrelated expansions have spliced further slots in between. A `Vec<T>`
//! would shift those positions out from under the recorded id; this
//! doesn't, because every slot lives at a fixed index in an
//! append-only arena and the sequence is threaded through `next` pointers.

#[derive(Debug, Clone)]
struct Slot<T> {
    value: Option<T>,
    next: Option<usize>,
}

/// An arena-backed singly linked list, expanded and drained at the front.
#[derive(Debug, Clone)]
pub struct Pushdown<T> {
    slots: Vec<Slot<T>>,
    head: Option<usize>,
}

impl<T> Pushdown<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: None,
        }
    }

    pub fn singleton(value: T) -> Self {
        let mut pushdown = Self::new();
        pushdown.push_front(value);
        pushdown
    }

    fn alloc(&mut self, value: T, next: Option<usize>) -> usize {
        let id = self.slots.len();
        self.slots.push(Slot {
            value: Some(value),
            next,
        });
        id
    }

    pub fn push_front(&mut self, value: T) -> usize {
        let id = self.alloc(value, self.head);
        self.head = Some(id);
        id
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn front_id(&self) -> Option<usize> {
        self.head
    }

    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.slots[id].value.as_ref())
    }

    pub fn get(&self, id: usize) -> &T {
        self.slots[id]
            .value
            .as_ref()
            .expect("stable slot id referenced after it was consumed")
    }

    pub fn get_mut(&mut self, id: usize) -> &mut T {
        self.slots[id]
            .value
            .as_mut()
            .expect("stable slot id referenced after it was consumed")
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.head?;
        let slot = &mut self.slots[id];
        self.head = slot.next;
        slot.value.take()
    }

    /// Replaces the current front slot with `values`, front to back,
    /// splicing the result in ahead of whatever the old front pointed to.
    /// Returns the fresh slot ids, in the same front-to-back order, so the
    /// caller can record them as attribute-routing targets.
    ///
    /// Panics if the pushdown is empty: there is no front slot to expand.
    pub fn expand_front(&mut self, values: impl IntoIterator<Item = T>) -> Vec<usize> {
        self.expand_at(None, self.head, values)
    }

    /// Replaces the first slot (front to back) matching `matches`, leaving
    /// everything before it untouched. Used where an earlier expansion may
    /// have left undrained terminals ahead of the position a rule actually
    /// targets.
    ///
    /// Panics if no slot matches.
    pub fn expand_first_matching(
        &mut self,
        matches: impl Fn(&T) -> bool,
        values: impl IntoIterator<Item = T>,
    ) -> Vec<usize> {
        let mut prev = None;
        let mut cur = self.head;
        while let Some(id) = cur {
            if matches(self.get(id)) {
                return self.expand_at(prev, Some(id), values);
            }
            prev = Some(id);
            cur = self.slots[id].next;
        }
        panic!("expand_first_matching: no slot matched");
    }

    /// Replaces the *last* slot (front to back) matching `matches`. A
    /// reverse replay rebuilds a rightmost derivation: the pending
    /// nonterminal a given rule must expand is the rightmost one still
    /// outstanding, not necessarily the one nearest the front.
    ///
    /// Panics if no slot matches.
    pub fn expand_last_matching(
        &mut self,
        matches: impl Fn(&T) -> bool,
        values: impl IntoIterator<Item = T>,
    ) -> Vec<usize> {
        let mut prev = None;
        let mut cur = self.head;
        let mut found = None;
        while let Some(id) = cur {
            if matches(self.get(id)) {
                found = Some((prev, id));
            }
            prev = Some(id);
            cur = self.slots[id].next;
        }
        let (target_prev, target) = found.expect("expand_last_matching: no slot matched");
        self.expand_at(target_prev, Some(target), values)
    }

    /// Splices `values` in place of the slot at `target` (whose predecessor
    /// in the list, if any, is `prev`), front to back.
    fn expand_at(
        &mut self,
        prev: Option<usize>,
        target: Option<usize>,
        values: impl IntoIterator<Item = T>,
    ) -> Vec<usize> {
        let current = target.expect("expand_at: no target slot");
        let rest = self.slots[current].next;
        self.slots[current].value = None;

        let values: Vec<T> = values.into_iter().collect();
        let mut ids = Vec::with_capacity(values.len());
        let mut tail = rest;
        for value in values.into_iter().rev() {
            let id = self.alloc(value, tail);
            tail = Some(id);
            ids.push(id);
        }
        ids.reverse();
        let new_head = if ids.is_empty() { rest } else { Some(ids[0]) };
        match prev {
            Some(p) => self.slots[p].next = new_head,
            None => self.head = new_head,
        }
        ids
    }

    /// Drains every remaining slot from front to back.
    pub fn into_vec(mut self) -> Vec<T> {
        let mut out = Vec::new();
        while let Some(value) = self.pop_front() {
            out.push(value);
        }
        out
    }
}

impl<T> Default for Pushdown<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_front_preserves_ids_recorded_before_a_deeper_expansion() {
        let mut pd: Pushdown<char> = Pushdown::singleton('A');
        let first_ids = pd.expand_front(vec!['x', 'B', 'y']);
        // 'B' is still unexpanded; record a "target" pointing at 'x'.
        let recorded_target = first_ids[0];

        // Now something deeper expands unrelated to 'x': drain 'x' first.
        assert_eq!(pd.pop_front(), Some('x'));
        assert_eq!(pd.front(), Some(&'B'));

        let _ = pd.expand_front(vec!['p', 'q']);
        assert_eq!(pd.front(), Some(&'p'));

        // The id recorded earlier still resolves to the original value.
        assert_eq!(*pd.get(recorded_target), 'x');
    }

    #[test]
    fn expand_front_with_no_values_collapses_through() {
        let mut pd: Pushdown<char> = Pushdown::singleton('A');
        pd.push_front('Z');
        assert_eq!(pd.front(), Some(&'Z'));
        let ids = pd.expand_front(Vec::<char>::new());
        assert!(ids.is_empty());
        assert_eq!(pd.front(), Some(&'A'));
    }

    #[test]
    fn into_vec_yields_front_to_back_order() {
        let mut pd: Pushdown<u32> = Pushdown::singleton(1);
        pd.expand_front(vec![2, 3, 4]);
        assert_eq!(pd.into_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn expand_last_matching_targets_the_rightmost_candidate() {
        // ['x', 'N', 'y', 'N', 'z'] — two 'N' placeholders pending.
        let mut pd: Pushdown<char> = Pushdown::singleton('N');
        pd.expand_front(vec!['x', 'N', 'y', 'N', 'z']);
        let ids = pd.expand_last_matching(|c| *c == 'N', vec!['R']);
        assert_eq!(pd.into_vec(), vec!['x', 'N', 'y', 'R', 'z']);
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn expand_first_matching_targets_the_leftmost_candidate() {
        let mut pd: Pushdown<char> = Pushdown::singleton('N');
        pd.expand_front(vec!['x', 'N', 'y', 'N', 'z']);
        pd.expand_first_matching(|c| *c == 'N', vec!['L']);
        assert_eq!(pd.into_vec(), vec!['x', 'L', 'y', 'N', 'z']);
    }
}
