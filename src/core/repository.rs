use crate::domain::ports::Identifiable;
use crate::utils::error::{AcademicError, Result};
use std::collections::HashMap;
use std::rc::Rc;

/// Keyed in-memory store. Values are shared handles so enrollments can keep
/// pointing at an entity after it is removed or replaced here.
#[derive(Debug)]
pub struct Repository<T: Identifiable> {
    items: HashMap<String, Rc<T>>,
    // insertion order, for reproducible listings
    order: Vec<String>,
}

impl<T: Identifiable> Default for Repository<T> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T: Identifiable> Repository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: T) -> Result<()> {
        let id = item.identifier().to_string();
        if self.items.contains_key(&id) {
            return Err(AcademicError::duplicate_key(T::KIND, &id));
        }
        tracing::info!("{} added to repository: {}", T::KIND, id);
        self.items.insert(id.clone(), Rc::new(item));
        self.order.push(id);
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> Option<Rc<T>> {
        self.items.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.items.remove(id).is_some();
        if removed {
            self.order.retain(|key| key != id);
            tracing::info!("{} removed from repository: {}", T::KIND, id);
        }
        removed
    }

    pub fn all_values(&self) -> impl Iterator<Item = &Rc<T>> + '_ {
        self.order.iter().filter_map(move |id| self.items.get(id))
    }

    pub fn find_where<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Rc<T>> + 'a
    where
        P: Fn(&T) -> bool + 'a,
    {
        self.all_values().filter(move |item| predicate(item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Identifiable + Clone> Repository<T> {
    /// Copy-on-write update. Holders of the previous handle keep the old version.
    /// The identifier must not change.
    pub fn modify<F>(&mut self, id: &str, update: F) -> Result<()>
    where
        F: FnOnce(&mut T),
    {
        let current = self
            .items
            .get(id)
            .ok_or_else(|| AcademicError::not_found(T::KIND, id))?;

        let mut updated = T::clone(current);
        update(&mut updated);
        if updated.identifier() != id {
            return Err(AcademicError::invalid_input(
                "identifier",
                updated.identifier(),
                format!("the identifier of {} '{}' cannot change", T::KIND, id),
            ));
        }

        self.items.insert(id.to_string(), Rc::new(updated));
        tracing::info!("{} updated in repository: {}", T::KIND, id);
        Ok(())
    }
}
