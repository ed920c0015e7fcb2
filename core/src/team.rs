//! Founder setup and hiring candidates.
//!
//! Founders are created once, from a player-chosen point allocation.
//! Everyone else arrives through `generate_candidate` and the hire handler.

use crate::{
    error::{SimError, SimResult},
    rng::SubsystemRng,
    state::{Attributes, MemberRole, TeamMember},
};
use serde::{Deserialize, Serialize};

pub const ATTRIBUTE_MIN: u8 = 1;
pub const ATTRIBUTE_MAX: u8 = 10;

/// A player's founder attribute allocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FounderProfile {
    pub attributes: Attributes,
}

impl FounderProfile {
    /// Spread `points` as evenly as possible, earlier attributes first.
    pub fn balanced(points: u8) -> Self {
        let base = points / 3;
        let rem = points % 3;
        Self {
            attributes: Attributes {
                coding:    base + u8::from(rem > 0),
                design:    base + u8::from(rem > 1),
                marketing: base,
            },
        }
    }
}

/// Validate an allocation and mint the founder.
pub fn create_founder(
    profile: &FounderProfile,
    points:  u8,
    rng:     &mut SubsystemRng,
) -> SimResult<TeamMember> {
    let a = profile.attributes;
    for (name, value) in [("coding", a.coding), ("design", a.design), ("marketing", a.marketing)] {
        if !(ATTRIBUTE_MIN..=ATTRIBUTE_MAX).contains(&value) {
            return Err(SimError::InvalidFounder {
                reason: format!("{name} = {value} outside {ATTRIBUTE_MIN}..={ATTRIBUTE_MAX}"),
            });
        }
    }
    if a.total() != u32::from(points) {
        return Err(SimError::InvalidFounder {
            reason: format!("allocated {} of {points} points", a.total()),
        });
    }
    Ok(TeamMember {
        id:         mint_id(rng),
        role:       MemberRole::Founder,
        attributes: a,
    })
}

struct Ranges {
    coding:    (u8, u8),
    design:    (u8, u8),
    marketing: (u8, u8),
}

fn ranges_for(role: MemberRole) -> Option<Ranges> {
    match role {
        MemberRole::Founder => None,
        MemberRole::Engineer => Some(Ranges { coding: (6, 9), design: (1, 4), marketing: (1, 3) }),
        MemberRole::Designer => Some(Ranges { coding: (2, 5), design: (6, 9), marketing: (1, 4) }),
        MemberRole::Marketer => Some(Ranges { coding: (1, 3), design: (1, 4), marketing: (6, 9) }),
    }
}

/// A hiring candidate for a non-founder role. Returns None for founders.
pub fn generate_candidate(role: MemberRole, rng: &mut SubsystemRng) -> Option<TeamMember> {
    let r = ranges_for(role)?;
    let attributes = Attributes {
        coding:    rng.range_inclusive(r.coding.0, r.coding.1),
        design:    rng.range_inclusive(r.design.0, r.design.1),
        marketing: rng.range_inclusive(r.marketing.0, r.marketing.1),
    };
    Some(TeamMember { id: mint_id(rng), role, attributes })
}

fn mint_id(rng: &mut SubsystemRng) -> String {
    uuid::Builder::from_random_bytes(rng.next_bytes_16())
        .into_uuid()
        .to_string()
}
