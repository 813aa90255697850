use std::collections::VecDeque;

use crate::Customer;

/// The line of customers waiting for a free server.
///
/// Abstraction over [`VecDeque`] that only allows the operations of a FIFO queue: customers
/// join at the back and are served from the front. The capacity is unlimited, so joining the
/// line never fails.
///
/// [`VecDeque`]: https://doc.rust-lang.org/std/collections/struct.VecDeque.html
///
/// # Examples
///
/// ```
/// # use storesim::{Customer, CustomerId, CustomerQueue, Tick};
/// let mut queue = CustomerQueue::default();
/// queue.enqueue(Customer::new(CustomerId::from(0), Tick::from(0)));
/// queue.enqueue(Customer::new(CustomerId::from(1), Tick::from(2)));
/// assert_eq!(queue.len(), 2);
/// assert_eq!(queue.dequeue_front().map(|c| c.id()), Some(CustomerId::from(0)));
/// assert_eq!(queue.dequeue_front().map(|c| c.id()), Some(CustomerId::from(1)));
/// assert!(queue.dequeue_front().is_none());
/// ```
#[derive(Debug, Default, Clone)]
pub struct CustomerQueue {
    inner: VecDeque<Customer>,
}

impl CustomerQueue {
    /// Appends a customer to the back of the queue.
    pub fn enqueue(&mut self, customer: Customer) {
        self.inner.push_back(customer);
    }

    /// Removes the customer at the front and returns it, or `None` if the queue is empty.
    pub fn dequeue_front(&mut self) -> Option<Customer> {
        self.inner.pop_front()
    }

    /// Returns the number of waiting customers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if nobody is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over waiting customers, from the front of the queue.
    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.inner.iter()
    }
}
