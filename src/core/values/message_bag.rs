/// Messages received or emitted on one port during one simulation step.
///
/// Messages keep their insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBag<T> {
    pub messages: Vec<T>,
}

impl<T> MessageBag<T> {
    /// Create an empty bag
    pub fn new() -> Self {
        Self { messages: Vec::new() }
    }

    /// Append a message
    pub fn push(&mut self, message: T) {
        self.messages.push(message);
    }

    /// Messages in arrival order
    pub fn messages(&self) -> &[T] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop all messages (end of step)
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.messages.iter()
    }
}

impl<T: Clone> MessageBag<T> {
    /// Append copies of `other`'s messages after the current ones
    pub fn extend_from(&mut self, other: &MessageBag<T>) {
        self.messages.extend_from_slice(&other.messages);
    }
}

impl<T> Default for MessageBag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for MessageBag<T> {
    fn from(messages: Vec<T>) -> Self {
        Self { messages }
    }
}

impl<T> FromIterator<T> for MessageBag<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a MessageBag<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
