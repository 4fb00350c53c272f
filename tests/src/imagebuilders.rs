use crate::data::*;
use crate::fixtures::*;
use diesel::prelude::*;
use imagerd::models::ImageBuilder;
use imagerd::schema::imagebuilders;
use imagerd_common::api::BuilderStatus;
use rstest::rstest;

fn count_builders(connection: &mut SqliteConnection) -> i64 {
    imagebuilders::table.count().get_result(connection).unwrap()
}

#[rstest]
pub fn first_status_query_registers_the_environment(isolated_database: IsolatedDatabase) {
    let mut connection = isolated_database.connection();

    let status = ImageBuilder::status(&subtarget_key(), &mut connection).unwrap();

    assert_eq!(status, BuilderStatus::Requested);
    assert_eq!(count_builders(&mut connection), 1);
}

#[rstest]
pub fn status_query_is_idempotent(isolated_database: IsolatedDatabase) {
    let mut connection = isolated_database.connection();

    ImageBuilder::status(&subtarget_key(), &mut connection).unwrap();
    let status = ImageBuilder::status(&subtarget_key(), &mut connection).unwrap();

    assert_eq!(status, BuilderStatus::Requested);
    assert_eq!(count_builders(&mut connection), 1);
}

#[rstest]
pub fn claim_next_follows_arrival_order(isolated_database: IsolatedDatabase) {
    let mut connection = isolated_database.connection();

    ImageBuilder::status(&subtarget_key(), &mut connection).unwrap();
    ImageBuilder::status(&other_subtarget_key(), &mut connection).unwrap();

    let first = ImageBuilder::claim_next(&mut connection).unwrap().unwrap();
    let second = ImageBuilder::claim_next(&mut connection).unwrap().unwrap();

    assert_eq!(first, subtarget_key());
    assert_eq!(second, other_subtarget_key());
    assert!(ImageBuilder::claim_next(&mut connection).unwrap().is_none());
}

#[rstest]
pub fn claimed_environment_reports_initialize(isolated_database: IsolatedDatabase) {
    let mut connection = isolated_database.connection();

    ImageBuilder::status(&subtarget_key(), &mut connection).unwrap();
    ImageBuilder::claim_next(&mut connection).unwrap().unwrap();

    let status = ImageBuilder::status(&subtarget_key(), &mut connection).unwrap();
    assert_eq!(status, BuilderStatus::Initialize);
}

#[rstest]
pub fn set_status_stores_pipeline_states(isolated_database: IsolatedDatabase) {
    let mut connection = isolated_database.connection();

    ImageBuilder::status(&subtarget_key(), &mut connection).unwrap();
    ImageBuilder::set_status(
        &subtarget_key(),
        BuilderStatus::from("download_imagebuilder".to_string()),
        &mut connection,
    )
    .unwrap();

    let status = ImageBuilder::status(&subtarget_key(), &mut connection).unwrap();
    assert_eq!(
        status,
        BuilderStatus::Other("download_imagebuilder".to_string())
    );

    // an environment parked in a foreign state is not claimable
    assert!(ImageBuilder::claim_next(&mut connection).unwrap().is_none());
}

#[rstest]
pub fn set_status_for_unknown_environment_is_an_error(isolated_database: IsolatedDatabase) {
    let mut connection = isolated_database.connection();

    let result = ImageBuilder::set_status(
        &subtarget_key(),
        BuilderStatus::Initialize,
        &mut connection,
    );

    assert!(result.is_err());
}
