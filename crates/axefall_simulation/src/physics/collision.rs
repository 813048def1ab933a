//! Collision groups по ролям акторов.
//!
//! Membership/filter вместо числовых layer-индексов: адаптер движка
//! переносит группы в свой physics step как есть.

use bevy_rapier3d::prelude::{CollisionGroups, Group};

use crate::components::ActorRole;

pub const PLAYER_GROUP: Group = Group::GROUP_1;
pub const ENEMY_GROUP: Group = Group::GROUP_2;
pub const WEAPON_GROUP: Group = Group::GROUP_3;
pub const WORLD_GROUP: Group = Group::GROUP_4;

/// Группы тела по его роли
pub fn role_groups(role: ActorRole) -> CollisionGroups {
    match role {
        ActorRole::Player => CollisionGroups::new(
            PLAYER_GROUP,
            ENEMY_GROUP | WEAPON_GROUP | WORLD_GROUP,
        ),
        ActorRole::Enemy => CollisionGroups::new(
            ENEMY_GROUP,
            PLAYER_GROUP | ENEMY_GROUP | WEAPON_GROUP | WORLD_GROUP,
        ),
        ActorRole::Obstacle => CollisionGroups::new(
            WORLD_GROUP,
            PLAYER_GROUP | ENEMY_GROUP | WEAPON_GROUP,
        ),
    }
}

/// Группы летящего клинка: встречается со всеми, кроме других клинков
pub fn weapon_groups() -> CollisionGroups {
    CollisionGroups::new(WEAPON_GROUP, PLAYER_GROUP | ENEMY_GROUP | WORLD_GROUP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_meets_world_and_actors() {
        let groups = weapon_groups();
        assert!(groups.filters.contains(PLAYER_GROUP));
        assert!(groups.filters.contains(ENEMY_GROUP));
        assert!(groups.filters.contains(WORLD_GROUP));
        assert!(!groups.filters.contains(WEAPON_GROUP));
    }

    #[test]
    fn test_role_membership_matches_role() {
        assert_eq!(
            role_groups(ActorRole::Player).memberships,
            PLAYER_GROUP
        );
        assert_eq!(role_groups(ActorRole::Enemy).memberships, ENEMY_GROUP);
        assert_eq!(
            role_groups(ActorRole::Obstacle).memberships,
            WORLD_GROUP
        );
    }

    #[test]
    fn test_filters_are_symmetric_for_weapon() {
        // Если клинок видит игрока, игрок должен видеть клинок
        let weapon = weapon_groups();
        let player = role_groups(ActorRole::Player);
        assert!(weapon.filters.contains(player.memberships));
        assert!(player.filters.contains(weapon.memberships));
    }
}
