//! Typed placeholders for references that can only be resolved once all
//! the symbols exist.
//!
//! The first pass registers a request (e.g. a type name) in the
//! [`Registry`] of its [`Category`] and keeps the returned [`Pending`]
//! handle in its node. The resolver then resolves each registry as a whole
//! into [`Resolutions`], and the finished IR is built by looking every
//! handle up. A handle is only meaningful together with the registry that
//! issued it; the category parameter keeps handles of different kinds
//! from being mixed up.

use crate::diag::Diag;
use std::fmt;
use std::marker::PhantomData;

/// A kind of reference awaiting resolution.
pub trait Category {
    /// What the first pass knows about the reference.
    type Request;

    /// What the reference resolves to.
    type Output: Clone;
}

/// Handle to a registered request.
pub struct Pending<C> {
    index: usize,
    category: PhantomData<fn() -> C>,
}

impl<C> Clone for Pending<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Pending<C> {}

impl<C> PartialEq for Pending<C> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<C> Eq for Pending<C> {}

impl<C> fmt::Debug for Pending<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pending({})", self.index)
    }
}

/// Requests of one category, in registration order.
pub struct Registry<C: Category> {
    requests: Vec<C::Request>,
}

impl<C: Category> Default for Registry<C> {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
        }
    }
}

impl<C: Category> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("requests", &self.requests.len())
            .finish()
    }
}

impl<C: Category> Registry<C> {
    pub fn register(&mut self, request: C::Request) -> Pending<C> {
        self.requests.push(request);
        Pending {
            index: self.requests.len() - 1,
            category: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[C::Request] {
        &self.requests
    }

    /// Resolves every request, in registration order.
    ///
    /// All requests are attempted; the errors of the failed ones are
    /// returned together.
    pub fn resolve_with<F>(&self, mut resolve: F) -> Result<Resolutions<C>, Vec<Diag>>
    where
        F: FnMut(&C::Request) -> Result<C::Output, Diag>,
    {
        let mut outputs = Vec::with_capacity(self.requests.len());
        let mut errors = Vec::new();

        for request in &self.requests {
            match resolve(request) {
                Ok(output) => outputs.push(output),
                Err(diag) => errors.push(diag),
            }
        }

        if errors.is_empty() {
            Ok(Resolutions { outputs })
        } else {
            Err(errors)
        }
    }
}

/// Resolved values of one category, indexed by [`Pending`] handles.
pub struct Resolutions<C: Category> {
    outputs: Vec<C::Output>,
}

impl<C: Category> fmt::Debug for Resolutions<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolutions")
            .field("outputs", &self.outputs.len())
            .finish()
    }
}

impl<C: Category> Resolutions<C> {
    /// The value the handle resolved to.
    ///
    /// Handles are only issued by the registry these resolutions were
    /// computed from, so the lookup cannot miss.
    pub fn get(&self, pending: Pending<C>) -> &C::Output {
        &self.outputs[pending.index]
    }

    /// Like [`Resolutions::get`], but cloned.
    pub fn resolved(&self, pending: Pending<C>) -> C::Output {
        self.get(pending).clone()
    }

    /// Resolved values in registration order, parallel to
    /// [`Registry::requests`].
    pub fn outputs(&self) -> &[C::Output] {
        &self.outputs
    }
}
