use sea_orm::{ColumnTrait, Condition};

use crate::models::ads::{self, Status};
use crate::workflow::Actor;

/// Whether the actor may observe this ad at all.
///
/// Admin and support see everything. Everyone else sees their own ads (all
/// statuses), OPEN ads, and ASSIGNED/DONE ads they are assigned to.
/// CANCELED ads are never shown to a contractor, even one that was
/// previously assigned or had applied.
pub fn can_view(actor: &Actor, ad: &ads::Model) -> bool {
    if actor.caps.admin || actor.caps.support {
        return true;
    }
    if ad.creator_id == actor.id {
        return true;
    }
    match ad.status {
        Status::Open => true,
        Status::Canceled => false,
        Status::Assigned | Status::Done => ad.assigned_contractor_id == Some(actor.id),
    }
}

/// The same rule as [`can_view`], expressed as a SeaORM condition for list
/// queries so filtering happens in the database.
pub fn visible_condition(actor: &Actor) -> Condition {
    if actor.caps.admin || actor.caps.support {
        return Condition::all();
    }
    Condition::any()
        .add(ads::Column::CreatorId.eq(actor.id))
        .add(ads::Column::Status.eq(Status::Open))
        .add(
            Condition::all()
                .add(ads::Column::Status.is_in([Status::Assigned, Status::Done]))
                .add(ads::Column::AssignedContractorId.eq(actor.id)),
        )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::users::Role;

    fn ad(creator: Uuid, status: Status, assignee: Option<Uuid>) -> ads::Model {
        let now = Utc::now();
        ads::Model {
            id: Uuid::new_v4(),
            creator_id: creator,
            title: "Fix my sink".into(),
            description: "Kitchen sink leaking".into(),
            category: "plumbing".into(),
            status,
            assigned_contractor_id: assignee,
            scheduled_at: None,
            location: None,
            work_reported_done_at: None,
            completed_at: None,
            canceled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn open_ads_are_visible_to_everyone() {
        let creator = Uuid::new_v4();
        let open = ad(creator, Status::Open, None);
        let contractor = Actor::new(Uuid::new_v4(), Role::Contractor, false);
        let other_customer = Actor::new(Uuid::new_v4(), Role::Customer, false);
        assert!(can_view(&contractor, &open));
        assert!(can_view(&other_customer, &open));
    }

    #[test]
    fn assigned_ad_is_visible_only_to_parties_and_staff() {
        let creator = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let assigned = ad(creator, Status::Assigned, Some(assignee));

        assert!(can_view(
            &Actor::new(creator, Role::Customer, false),
            &assigned
        ));
        assert!(can_view(
            &Actor::new(assignee, Role::Contractor, false),
            &assigned
        ));
        assert!(can_view(
            &Actor::new(Uuid::new_v4(), Role::Support, false),
            &assigned
        ));
        assert!(!can_view(
            &Actor::new(Uuid::new_v4(), Role::Contractor, false),
            &assigned
        ));
        assert!(!can_view(
            &Actor::new(Uuid::new_v4(), Role::Customer, false),
            &assigned
        ));
    }

    #[test]
    fn canceled_ad_is_hidden_from_contractors_even_the_assignee() {
        let creator = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        // Canceled while assigned: the former assignee must not see it.
        let canceled = ad(creator, Status::Canceled, None);

        assert!(!can_view(
            &Actor::new(assignee, Role::Contractor, false),
            &canceled
        ));
        assert!(can_view(
            &Actor::new(creator, Role::Customer, false),
            &canceled
        ));
        assert!(can_view(
            &Actor::new(Uuid::new_v4(), Role::Support, false),
            &canceled
        ));
        assert!(can_view(
            &Actor::new(Uuid::new_v4(), Role::Customer, true),
            &canceled
        ));
    }

    #[test]
    fn done_ad_stays_visible_to_the_assignee() {
        let creator = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let done = ad(creator, Status::Done, Some(assignee));
        assert!(can_view(
            &Actor::new(assignee, Role::Contractor, false),
            &done
        ));
        assert!(!can_view(
            &Actor::new(Uuid::new_v4(), Role::Contractor, false),
            &done
        ));
    }
}
