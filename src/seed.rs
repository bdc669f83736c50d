//! Demo data for a fresh session: the Lyon collection point catalog, the
//! partner reward catalog and a sample household.

use chrono::{DateTime, TimeZone, Utc};

use crate::{
    config::Config,
    directory::{CollectionPoint, PointCategory},
    engine::RecyclingEngine,
    error::{PileError, Result},
    inventory::{BatteryKind, BatteryManager},
    rewards::{Achievement, LevelScale, PointsLedger, Reward, RewardKind, UserProfile, MILESTONES},
};

fn date(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| {
            PileError::Validation(format!("invalid seed date {}-{:02}-{:02}", year, month, day))
        })
}

fn point(
    id: &str,
    name: &str,
    address: &str,
    (lat, lng): (f64, f64),
    category: PointCategory,
    active: bool,
    hours: &str,
) -> CollectionPoint {
    CollectionPoint {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        lat,
        lng,
        category,
        active,
        hours: Some(hours.to_string()),
    }
}

pub fn collection_points() -> Vec<CollectionPoint> {
    vec![
        point(
            "1",
            "Super U Confluence",
            "112 Cours Charlemagne, 69002 Lyon",
            (45.7396, 4.8150),
            PointCategory::Store,
            true,
            "8h-20h (Lun-Sam)",
        ),
        point(
            "2",
            "École Primaire Jean Moulin",
            "25 Rue Jean Moulin, 69003 Lyon",
            (45.7578, 4.8351),
            PointCategory::School,
            true,
            "8h-17h (Lun-Ven)",
        ),
        point(
            "3",
            "Mairie du 2ème",
            "2 Rue d'Enghien, 69002 Lyon",
            (45.7480, 4.8320),
            PointCategory::Public,
            true,
            "9h-17h (Lun-Ven)",
        ),
        point(
            "4",
            "Festival des Lumières - Stand Corepile",
            "Place Bellecour, 69002 Lyon",
            (45.7558, 4.8320),
            PointCategory::Event,
            true,
            "18h-23h (8-12 Déc)",
        ),
        point(
            "5",
            "Carrefour Part-Dieu",
            "Centre Commercial Part-Dieu, 69003 Lyon",
            (45.7604, 4.8567),
            PointCategory::Store,
            true,
            "9h-21h (Lun-Sam)",
        ),
        point(
            "6",
            "Médiathèque de Gerland",
            "25 Rue Jules Verne, 69007 Lyon",
            (45.7313, 4.8302),
            PointCategory::Public,
            false,
            "Fermée pour travaux",
        ),
    ]
}

pub fn reward_catalog() -> Vec<Reward> {
    let reward = |id: &str, kind, title: &str, description: &str, points_required| Reward {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        description: description.to_string(),
        points_required,
        available: true,
    };

    vec![
        reward(
            "1",
            RewardKind::Drink,
            "Boisson gratuite",
            "Valable dans les événements partenaires",
            50,
        ),
        reward(
            "2",
            RewardKind::Bracelet,
            "Bracelet exclusif Corepile",
            "Bracelet en tissu recyclé aux couleurs de Corepile",
            100,
        ),
        reward(
            "3",
            RewardKind::Discount,
            "Réduction -10% magasins partenaires",
            "Valable 30 jours sur une sélection de produits",
            150,
        ),
        reward(
            "4",
            RewardKind::Goodies,
            "Kit écologique Corepile",
            "Sac, carnet et stylo écoresponsables",
            200,
        ),
    ]
}

/// A profile with a recycling history behind it
pub fn profile(name: &str) -> Result<UserProfile> {
    let unlocked = [date(2024, 1, 15)?, date(2024, 6, 10)?, date(2024, 11, 20)?];
    let achievements: Vec<Achievement> = MILESTONES
        .iter()
        .zip(unlocked)
        .map(|(milestone, at)| milestone.definition().unlock(at))
        .collect();

    Ok(UserProfile {
        id: "1".to_string(),
        name: name.to_string(),
        total_batteries_recycled: 47,
        total_points: 235,
        level: 0,
        events_attended: 3,
        achievements,
    })
}

pub fn batteries() -> Result<BatteryManager> {
    let mut manager = BatteryManager::new();
    manager.register_at(
        BatteryKind::Aa,
        "Duracell",
        "Télécommande TV",
        Some(date(2025, 1, 15)?),
        date(2024, 1, 15)?,
    )?;
    manager.register_at(
        BatteryKind::Aaa,
        "Energizer",
        "Souris ordinateur",
        Some(date(2024, 12, 1)?),
        date(2024, 2, 1)?,
    )?;
    manager.register_at(
        BatteryKind::NineV,
        "Varta",
        "Détecteur fumée",
        Some(date(2027, 3, 10)?),
        date(2024, 3, 10)?,
    )?;
    let lamp = manager.register_at(
        BatteryKind::Aa,
        "Duracell",
        "Lampe de poche",
        None,
        date(2024, 1, 1)?,
    )?;
    manager.mark_recycled_at(lamp.id, date(2024, 6, 1)?)?;
    Ok(manager)
}

/// Engine pre-loaded with the demo household
pub fn engine(config: &Config) -> Result<RecyclingEngine> {
    let ledger = PointsLedger::new(
        profile(&config.profile.user_name)?,
        LevelScale::from_config(&config.points),
    );
    Ok(RecyclingEngine::from_parts(batteries()?, ledger, config))
}
