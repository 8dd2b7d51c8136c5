use parkverse_dispatch::usecase::preference::{
    BulkUpdatePreferencesUseCase, GetPreferencesUseCase, LegacyBitmaskUseCase, PreferenceUpdate,
    ShouldDeliverUseCase,
};
use parkverse_domain::legacy::LegacyFlag;
use parkverse_domain::notification::{Channel, EventType, default_channels};

use crate::helpers::{MockPreferenceRepo, pref};

const USER: i64 = 42;

#[tokio::test]
async fn should_deliver_follows_defaults_without_rows() {
    let uc = ShouldDeliverUseCase {
        repo: MockPreferenceRepo::empty(),
    };

    for event_type in EventType::ALL {
        for channel in Channel::ALL {
            let expected = default_channels(event_type).contains(&channel);
            let actual = uc.execute(USER, event_type, channel).await.unwrap();
            assert_eq!(
                actual,
                expected,
                "default mismatch for {:?}/{:?}",
                event_type,
                channel
            );
        }
    }
}

#[tokio::test]
async fn explicit_row_overrides_the_default() {
    let uc = ShouldDeliverUseCase {
        repo: MockPreferenceRepo::new(vec![
            pref(USER, EventType::XpGain, Channel::Web, false),
            pref(USER, EventType::RecordEdited, Channel::DiscordDm, true),
        ]),
    };

    assert!(!uc.execute(USER, EventType::XpGain, Channel::Web).await.unwrap());
    assert!(
        uc.execute(USER, EventType::RecordEdited, Channel::DiscordDm)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn other_users_rows_are_invisible() {
    let uc = ShouldDeliverUseCase {
        repo: MockPreferenceRepo::new(vec![pref(7, EventType::XpGain, Channel::Web, false)]),
    };
    assert!(uc.execute(USER, EventType::XpGain, Channel::Web).await.unwrap());
}

#[tokio::test]
async fn preference_grid_covers_every_type_and_channel() {
    let uc = GetPreferencesUseCase {
        repo: MockPreferenceRepo::new(vec![pref(
            USER,
            EventType::LootboxEarned,
            Channel::DiscordDm,
            false,
        )]),
    };
    let grid = uc.execute(USER).await.unwrap();

    assert_eq!(grid.len(), EventType::ALL.len());
    for resolved in &grid {
        assert_eq!(resolved.channels.len(), Channel::ALL.len());
    }

    let lootbox = grid
        .iter()
        .find(|p| p.event_type == EventType::LootboxEarned)
        .unwrap();
    let dm = lootbox
        .channels
        .iter()
        .find(|(channel, _)| *channel == Channel::DiscordDm)
        .unwrap();
    assert!(!dm.1, "explicit disable must show up in the grid");
    let web = lootbox
        .channels
        .iter()
        .find(|(channel, _)| *channel == Channel::Web)
        .unwrap();
    assert!(web.1, "untouched cells keep the default");
}

#[tokio::test]
async fn bulk_update_upserts_each_entry() {
    let repo = MockPreferenceRepo::empty();
    let rows = repo.rows_handle();

    let uc = BulkUpdatePreferencesUseCase { repo };
    uc.execute(
        USER,
        vec![
            PreferenceUpdate {
                event_type: EventType::XpGain,
                channel: Channel::Web,
                enabled: false,
            },
            PreferenceUpdate {
                event_type: EventType::XpGain,
                channel: Channel::Web,
                enabled: true,
            },
        ],
    )
    .await
    .unwrap();

    let rows = rows.lock().unwrap();
    assert_eq!(rows.len(), 1, "upsert must not duplicate the row");
    assert!(rows[0].enabled, "the later entry wins");
}

#[tokio::test]
async fn bulk_update_keeps_earlier_entries_when_a_later_one_fails() {
    let mut repo = MockPreferenceRepo::empty();
    repo.fail_on = Some((EventType::RankUp, Channel::Web));
    let rows = repo.rows_handle();

    let uc = BulkUpdatePreferencesUseCase { repo };
    let result = uc
        .execute(
            USER,
            vec![
                PreferenceUpdate {
                    event_type: EventType::XpGain,
                    channel: Channel::Web,
                    enabled: false,
                },
                PreferenceUpdate {
                    event_type: EventType::RankUp,
                    channel: Channel::Web,
                    enabled: false,
                },
                PreferenceUpdate {
                    event_type: EventType::Prestige,
                    channel: Channel::Web,
                    enabled: false,
                },
            ],
        )
        .await;

    assert!(result.is_err(), "the batch must surface the failure");
    let rows = rows.lock().unwrap();
    assert_eq!(rows.len(), 1, "entries before the failure persist");
    assert_eq!(rows[0].event_type, EventType::XpGain);
}

#[tokio::test]
async fn default_bitmask_has_all_eight_flags_set() {
    let uc = LegacyBitmaskUseCase {
        repo: MockPreferenceRepo::empty(),
    };
    // Every mapped (type, channel) pair is in the default table.
    assert_eq!(uc.execute(USER).await.unwrap(), 0xFF);
}

#[tokio::test]
async fn each_flag_clears_independently() {
    for flag in LegacyFlag::ALL {
        let (event_type, channel) = flag.mapping();
        let uc = LegacyBitmaskUseCase {
            repo: MockPreferenceRepo::new(vec![pref(USER, event_type, channel, false)]),
        };
        let bitmask = uc.execute(USER).await.unwrap();
        assert_eq!(
            bitmask,
            0xFF & !flag.bit(),
            "disabling {:?} must clear exactly bit {}",
            flag,
            flag.bit()
        );
    }
}

#[tokio::test]
async fn unrelated_rows_do_not_disturb_the_bitmask() {
    // record_edited/web is not part of the legacy contract.
    let uc = LegacyBitmaskUseCase {
        repo: MockPreferenceRepo::new(vec![pref(USER, EventType::RecordEdited, Channel::Web, true)]),
    };
    assert_eq!(uc.execute(USER).await.unwrap(), 0xFF);
}
