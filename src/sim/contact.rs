//! Avatar/platform collision response
//!
//! Resolution runs in two passes. The first separates the avatar from every
//! overlapping platform in index order and records the contacts; the second
//! applies platform effects. Effects therefore never change which platforms
//! the avatar was found touching this tick.

use super::collision::{Side, rect_rect, rests_on, separate_rect};
use super::platform::{Platform, PlatformKind};
use super::state::{Avatar, GameEvent};

/// A resolved avatar/platform contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformContact {
    /// Index into the platform slice
    pub index: usize,
    pub side: Side,
}

/// Separate the avatar from all platforms and apply landing effects
///
/// `was_grounded` is the support state before this tick's integration. Returns
/// the events raised, in order.
pub fn resolve_platforms(avatar: &mut Avatar, platforms: &mut [Platform], was_grounded: bool) -> Vec<GameEvent> {
    let contacts = separate_from_platforms(avatar, platforms);
    let mut events = Vec::new();

    for contact in contacts.iter().filter(|c| c.side == Side::Top) {
        let platform = &mut platforms[contact.index];
        match platform.kind {
            PlatformKind::Boost { force } => {
                avatar.body.vel.y = force;
                avatar.body.on_ground = false;
                avatar.is_jumping = true;
                avatar.jump_cut_used = false;
                events.push(GameEvent::Boosted { platform: platform.id });
            }
            PlatformKind::Breakable { .. } => {
                if platform.start_breaking() {
                    log::debug!("Platform {} started breaking", platform.id);
                }
            }
            PlatformKind::Static | PlatformKind::Moving { .. } => {}
        }
    }

    if !was_grounded && avatar.body.on_ground {
        events.push(GameEvent::Landed);
    }

    events
}

/// Push the avatar out of each overlapping platform, re-querying after every correction
///
/// A second pass picks up every platform the avatar now stands flush on,
/// which covers seams between adjacent supports and sinks smaller than the
/// contact slop. Contacts come back in platform index order.
pub fn separate_from_platforms(avatar: &mut Avatar, platforms: &[Platform]) -> Vec<PlatformContact> {
    let mut contacts = Vec::new();

    for (index, platform) in platforms.iter().enumerate() {
        if platform.is_removed() {
            continue;
        }
        let rect = platform.rect();
        let Some(contact) = rect_rect(&avatar.rect(), &rect) else {
            continue;
        };

        separate_rect(&mut avatar.body.pos, avatar.size, &mut avatar.body.vel, &rect, &contact);
        if contact.side == Side::Top {
            ground(avatar);
        }
        contacts.push(PlatformContact {
            index,
            side: contact.side,
        });
    }

    // Rising avatars never rest on anything
    if avatar.body.vel.y >= 0.0 {
        for (index, platform) in platforms.iter().enumerate() {
            if platform.is_removed() || contacts.iter().any(|c| c.index == index) {
                continue;
            }
            let rect = platform.rect();
            if !rests_on(&avatar.rect(), &rect) {
                continue;
            }
            avatar.body.pos.y = rect.y - avatar.size.y;
            avatar.body.vel.y = 0.0;
            ground(avatar);
            contacts.push(PlatformContact { index, side: Side::Top });
        }
        contacts.sort_by_key(|c| c.index);
    }

    contacts
}

fn ground(avatar: &mut Avatar) {
    avatar.body.on_ground = true;
    avatar.is_jumping = false;
    avatar.jump_cut_used = false;
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::consts::*;
    use crate::sim::physics::Integrator;
    use crate::tuning::AvatarTuning;

    fn avatar_at(x: f32, y: f32) -> Avatar {
        Avatar::new(Vec2::new(x, y), &AvatarTuning::default())
    }

    fn platform(id: u32, x: f32, y: f32, width: f32, kind: PlatformKind) -> Platform {
        Platform::new(id, Vec2::new(x, y), width, 32.0, kind)
    }

    /// Integrate then resolve, the way a tick does
    fn step(avatar: &mut Avatar, platforms: &mut [Platform]) -> Vec<GameEvent> {
        let was_grounded = avatar.body.on_ground;
        Integrator::default().integrate(&mut avatar.body, FIXED_STEP_MS);
        resolve_platforms(avatar, platforms, was_grounded)
    }

    #[test]
    fn test_avatar_settles_on_platform() {
        let mut avatar = avatar_at(100.0, 400.0);
        let mut platforms = [platform(0, 50.0, 450.0, 200.0, PlatformKind::Static)];

        let events = step(&mut avatar, &mut platforms);
        assert_eq!(avatar.body.pos.y, 386.0);
        assert_eq!(avatar.body.vel.y, 0.0);
        assert!(avatar.body.on_ground);
        assert_eq!(events, vec![GameEvent::Landed]);
    }

    #[test]
    fn test_landing_fires_once_per_contact() {
        let mut avatar = avatar_at(100.0, 200.0);
        let mut platforms = [platform(0, 50.0, 450.0, 200.0, PlatformKind::Static)];

        let mut landed = 0;
        for _ in 0..240 {
            landed += step(&mut avatar, &mut platforms)
                .iter()
                .filter(|e| **e == GameEvent::Landed)
                .count();
            if avatar.body.on_ground {
                assert_eq!(avatar.body.pos.y, 386.0);
            }
        }
        assert_eq!(landed, 1);
        assert!(avatar.body.on_ground);
    }

    #[test]
    fn test_boost_launches_avatar() {
        let mut avatar = avatar_at(100.0, 420.0);
        avatar.body.vel.y = 5.0;
        let mut platforms = [platform(4, 50.0, 450.0, 200.0, PlatformKind::Boost { force: BOOST_FORCE })];

        let events = step(&mut avatar, &mut platforms);
        assert_eq!(avatar.body.vel.y, BOOST_FORCE);
        assert!(!avatar.body.on_ground);
        assert!(avatar.is_jumping);
        assert_eq!(events, vec![GameEvent::Boosted { platform: 4 }]);
    }

    #[test]
    fn test_breakable_starts_on_landing() {
        let mut avatar = avatar_at(100.0, 386.0);
        let kind = PlatformKind::Breakable {
            origin_x: 50.0,
            breaking: false,
            elapsed_ms: 0.0,
            duration_ms: BREAK_DURATION_MS,
        };
        let mut platforms = [platform(0, 50.0, 450.0, 200.0, kind)];

        step(&mut avatar, &mut platforms);
        assert!(avatar.body.on_ground);
        assert!(matches!(platforms[0].kind, PlatformKind::Breakable { breaking: true, .. }));
    }

    #[test]
    fn test_removed_platforms_are_ignored() {
        let mut avatar = avatar_at(100.0, 400.0);
        let mut platforms = [Platform::new(0, Vec2::new(50.0, 450.0), 0.0, 0.0, PlatformKind::Static)];
        let events = step(&mut avatar, &mut platforms);
        assert!(events.is_empty());
        assert!(!avatar.body.on_ground);
    }

    #[test]
    fn test_all_overlapping_platforms_resolved() {
        // Straddling two adjacent platforms of equal height
        let mut avatar = avatar_at(184.0, 386.0);
        avatar.body.on_ground = true;
        let mut platforms = [
            platform(0, 0.0, 450.0, 200.0, PlatformKind::Static),
            platform(1, 200.0, 450.0, 200.0, PlatformKind::Static),
        ];

        let contacts = {
            Integrator::default().integrate(&mut avatar.body, FIXED_STEP_MS);
            separate_from_platforms(&mut avatar, &platforms)
        };
        // The first snap leaves the avatar flush on the second, which still supports it
        assert_eq!(
            contacts,
            vec![
                PlatformContact { index: 0, side: Side::Top },
                PlatformContact { index: 1, side: Side::Top },
            ]
        );
        assert_eq!(avatar.body.pos.y, 386.0);

        let events = step(&mut avatar, &mut platforms);
        assert!(events.is_empty());
        assert!(avatar.body.on_ground);
    }

    #[test]
    fn test_seam_support_triggers_breakable_after_static() {
        let mut avatar = avatar_at(184.0, 386.0);
        avatar.body.on_ground = true;
        let breakable = PlatformKind::Breakable {
            origin_x: 200.0,
            breaking: false,
            elapsed_ms: 0.0,
            duration_ms: BREAK_DURATION_MS,
        };
        let mut platforms = [
            platform(0, 0.0, 450.0, 200.0, PlatformKind::Static),
            platform(1, 200.0, 450.0, 200.0, breakable),
        ];

        step(&mut avatar, &mut platforms);
        assert!(avatar.body.on_ground);
        assert!(matches!(platforms[1].kind, PlatformKind::Breakable { breaking: true, .. }));
    }

    #[test]
    fn test_flush_support_ignored_while_rising() {
        let mut avatar = avatar_at(100.0, 386.0);
        avatar.body.vel.y = -1.0;
        let mut platforms = [platform(0, 50.0, 450.0, 200.0, PlatformKind::Static)];

        let contacts = separate_from_platforms(&mut avatar, &platforms);
        assert!(contacts.is_empty());
        assert!(!avatar.body.on_ground);
        assert!(resolve_platforms(&mut avatar, &mut platforms, false).is_empty());
    }

    #[test]
    fn test_head_bump_stops_rise() {
        let mut avatar = avatar_at(100.0, 100.0);
        avatar.body.vel.y = -15.0;
        let mut platforms = [platform(0, 50.0, 60.0, 200.0, PlatformKind::Static)];

        step(&mut avatar, &mut platforms);
        assert_eq!(avatar.body.pos.y, 92.0);
        assert_eq!(avatar.body.vel.y, 0.0);
        assert!(!avatar.body.on_ground);
    }

    #[test]
    fn test_side_contact_blocks_horizontal_motion() {
        // Running into the left face of a tall block
        let mut avatar = avatar_at(0.0, 0.0);
        avatar.body.vel.x = 5.0;
        let mut platforms = [Platform::new(0, Vec2::new(35.0, -40.0), 50.0, 200.0, PlatformKind::Static)];

        step(&mut avatar, &mut platforms);
        assert_eq!(avatar.body.pos.x, 3.0);
        assert_eq!(avatar.body.vel.x, 0.0);
    }
}
