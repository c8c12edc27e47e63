//! Inventory-item aggregate implementation.

use common::AggregateId;

use crate::aggregate::{Aggregate, AggregateRoot, InvalidEntityState};
use crate::error::DomainError;

use super::{InventoryError, InventoryEvent};

/// Projected state of one inventory item.
///
/// All mutation flows through [`Aggregate::apply`]; command methods live
/// on [`AggregateRoot<InventoryItem>`] and stage events instead of
/// touching fields.
#[derive(Debug, Clone, Default)]
pub struct InventoryItem {
    id: Option<AggregateId>,
    activated: bool,
    name: String,
    quantity: i64,
}

impl Aggregate for InventoryItem {
    type Event = InventoryEvent;

    fn aggregate_type() -> &'static str {
        "InventoryItem"
    }

    fn id(&self) -> Option<AggregateId> {
        self.id
    }

    fn apply(&mut self, event: &InventoryEvent) {
        match event {
            InventoryEvent::Created { id, name } => {
                self.id = Some(*id);
                self.name = name.clone();
                self.activated = true;
            }
            InventoryEvent::Renamed { new_name } => {
                self.name = new_name.clone();
            }
            InventoryEvent::CheckedIn { count } => {
                self.quantity += count;
            }
            InventoryEvent::Removed { count } => {
                self.quantity -= count;
            }
            InventoryEvent::Deactivated => {
                self.activated = false;
            }
        }
    }

    fn ensure_valid(&self) -> Result<(), InvalidEntityState> {
        let mut violations = Vec::new();
        if self.id.is_none() {
            violations.push("id must be set".to_string());
        }
        if self.name.is_empty() {
            violations.push("name cannot be blank".to_string());
        }
        if self.quantity < 0 {
            violations.push("quantity cannot be negative".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(InvalidEntityState {
                entity: Self::aggregate_type(),
                violations,
            })
        }
    }
}

// Query methods
impl InventoryItem {
    /// Whether the item is live in the catalog.
    pub fn activated(&self) -> bool {
        self.activated
    }

    /// Current display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stock on hand.
    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

// Command methods (stage events through apply_change)
impl AggregateRoot<InventoryItem> {
    /// Creates a new item and stages its `Created` event.
    ///
    /// A blank name is caught by the invariant check, not by an argument
    /// guard, so the same rule also protects replays.
    pub fn create(id: AggregateId, name: impl Into<String>) -> Result<Self, DomainError> {
        let mut root = Self::new();
        root.apply_change(InventoryEvent::Created {
            id,
            name: name.into(),
        })?;
        Ok(root)
    }

    /// Changes the display name.
    pub fn rename(&mut self, new_name: impl Into<String>) -> Result<(), DomainError> {
        let new_name = new_name.into();
        if new_name.is_empty() {
            return Err(InventoryError::BlankName.into());
        }
        self.apply_change(InventoryEvent::Renamed { new_name })?;
        Ok(())
    }

    /// Records `count` items arriving into stock.
    pub fn check_in(&mut self, count: i64) -> Result<(), DomainError> {
        if count <= 0 {
            return Err(InventoryError::NonPositiveCheckIn { count }.into());
        }
        self.apply_change(InventoryEvent::CheckedIn { count })?;
        Ok(())
    }

    /// Records `count` items leaving stock.
    ///
    /// Only the sign of `count` is checked here; removing more than is on
    /// hand drives the quantity negative and is rejected by the invariant
    /// check instead.
    pub fn remove(&mut self, count: i64) -> Result<(), DomainError> {
        if count <= 0 {
            return Err(InventoryError::NonPositiveRemoval { count }.into());
        }
        self.apply_change(InventoryEvent::Removed { count })?;
        Ok(())
    }

    /// Retires the item from the catalog.
    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        if !self.state().activated() {
            return Err(InventoryError::AlreadyDeactivated.into());
        }
        self.apply_change(InventoryEvent::Deactivated)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DomainEvent;
    use common::Version;

    fn created_item() -> (AggregateRoot<InventoryItem>, AggregateId) {
        let id = AggregateId::new();
        let root = AggregateRoot::create(id, "Widget").unwrap();
        (root, id)
    }

    #[test]
    fn create_stages_exactly_one_created_event() {
        let (root, id) = created_item();

        assert_eq!(root.id(), Some(id));
        assert!(root.state().activated());
        assert_eq!(root.state().name(), "Widget");
        assert_eq!(root.state().quantity(), 0);

        let changes = root.uncommitted_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].event_type(), "InventoryItemCreated");
    }

    #[test]
    fn create_with_blank_name_is_an_invalid_state() {
        let err = AggregateRoot::<InventoryItem>::create(AggregateId::new(), "").unwrap_err();
        match err {
            DomainError::InvalidState(state) => {
                assert_eq!(state.entity, "InventoryItem");
                assert_eq!(state.violations, vec!["name cannot be blank"]);
            }
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn rename_stages_the_event_and_updates_the_name() {
        let (mut root, _) = created_item();
        root.rename("Sprocket").unwrap();

        assert_eq!(root.state().name(), "Sprocket");
        assert_eq!(root.uncommitted_changes().len(), 2);
        assert!(matches!(
            &root.uncommitted_changes()[1],
            InventoryEvent::Renamed { new_name } if new_name == "Sprocket"
        ));
    }

    #[test]
    fn rename_to_blank_is_rejected_before_staging() {
        let (mut root, _) = created_item();
        let err = root.rename("").unwrap_err();

        assert!(matches!(
            err,
            DomainError::Inventory(InventoryError::BlankName)
        ));
        assert_eq!(root.uncommitted_changes().len(), 1);
        assert_eq!(root.state().name(), "Widget");
    }

    #[test]
    fn check_in_accumulates_quantity() {
        let (mut root, _) = created_item();
        root.check_in(10).unwrap();
        root.check_in(5).unwrap();

        assert_eq!(root.state().quantity(), 15);
        assert_eq!(root.uncommitted_changes().len(), 3);
    }

    #[test]
    fn check_in_rejects_non_positive_counts() {
        let (mut root, _) = created_item();
        for count in [0, -4] {
            let err = root.check_in(count).unwrap_err();
            assert!(matches!(
                err,
                DomainError::Inventory(InventoryError::NonPositiveCheckIn { .. })
            ));
        }
        assert_eq!(root.uncommitted_changes().len(), 1);
    }

    #[test]
    fn remove_reduces_quantity() {
        let (mut root, _) = created_item();
        root.check_in(10).unwrap();
        root.remove(4).unwrap();

        assert_eq!(root.state().quantity(), 6);
    }

    #[test]
    fn remove_rejects_non_positive_counts() {
        let (mut root, _) = created_item();
        root.check_in(10).unwrap();

        let err = root.remove(0).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Inventory(InventoryError::NonPositiveRemoval { count: 0 })
        ));
    }

    #[test]
    fn removing_more_than_on_hand_violates_the_invariant() {
        let (mut root, _) = created_item();
        root.check_in(3).unwrap();

        let staged_before = root.uncommitted_changes().len();
        let err = root.remove(5).unwrap_err();
        match err {
            DomainError::InvalidState(state) => {
                assert_eq!(state.violations, vec!["quantity cannot be negative"]);
            }
            other => panic!("expected InvalidState, got {other:?}"),
        }
        // The offending event was never staged.
        assert_eq!(root.uncommitted_changes().len(), staged_before);
    }

    #[test]
    fn deactivate_retires_the_item_once() {
        let (mut root, _) = created_item();
        root.deactivate().unwrap();

        assert!(!root.state().activated());
        let err = root.deactivate().unwrap_err();
        assert!(matches!(
            err,
            DomainError::Inventory(InventoryError::AlreadyDeactivated)
        ));
        assert_eq!(root.uncommitted_changes().len(), 2);
    }

    #[test]
    fn replaying_a_history_rebuilds_the_same_state() {
        let id = AggregateId::new();
        let history = vec![
            InventoryEvent::Created {
                id,
                name: "Widget".to_string(),
            },
            InventoryEvent::CheckedIn { count: 10 },
            InventoryEvent::Removed { count: 4 },
            InventoryEvent::Renamed {
                new_name: "Sprocket".to_string(),
            },
        ];

        let mut root = AggregateRoot::<InventoryItem>::new();
        root.load_from_history(history.clone()).unwrap();

        assert_eq!(root.id(), Some(id));
        assert_eq!(root.state().quantity(), 6);
        assert_eq!(root.state().name(), "Sprocket");
        assert_eq!(root.version(), Version::new(4));

        let mut again = AggregateRoot::<InventoryItem>::new();
        again.load_from_history(history).unwrap();
        assert_eq!(again.state().quantity(), root.state().quantity());
        assert_eq!(again.version(), root.version());
    }

    #[test]
    fn replaying_a_history_that_overdraws_stock_fails() {
        let history = vec![
            InventoryEvent::Created {
                id: AggregateId::new(),
                name: "Widget".to_string(),
            },
            InventoryEvent::CheckedIn { count: 2 },
            InventoryEvent::Removed { count: 5 },
        ];

        let mut root = AggregateRoot::<InventoryItem>::new();
        let err = root.load_from_history(history).unwrap_err();
        assert_eq!(err.violations, vec!["quantity cannot be negative"]);
    }

    #[test]
    fn replaying_a_transient_overdraw_fails_even_when_stock_recovers() {
        // Quantity goes to -3 at event two and the history nets out to +7;
        // replay still rejects it because each event is validated as it is
        // applied, not once over the folded result.
        let history = vec![
            InventoryEvent::Created {
                id: AggregateId::new(),
                name: "Widget".to_string(),
            },
            InventoryEvent::Removed { count: 3 },
            InventoryEvent::CheckedIn { count: 10 },
        ];

        let mut root = AggregateRoot::<InventoryItem>::new();
        let err = root.load_from_history(history).unwrap_err();
        assert_eq!(err.violations, vec!["quantity cannot be negative"]);
    }
}
