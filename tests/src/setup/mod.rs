use crate::data::*;
use diesel::SqliteConnection;
use imagerd::models::{
    ImageRequest, NewImageRequest, NewRelease, NewSubtarget, NewWorker, PackageSet, Subtarget,
    Worker,
};
use imagerd_common::api::{BuildJob, BuildRequest, SubtargetKey};

pub fn setup_release(connection: &mut SqliteConnection) {
    NewRelease {
        distro: DUMMY_DISTRO.to_string(),
        release: DUMMY_RELEASE.to_string(),
    }
    .insert(connection)
    .unwrap();

    NewSubtarget::insert_batch(
        DUMMY_DISTRO,
        DUMMY_RELEASE,
        DUMMY_TARGET,
        &[
            DUMMY_SUBTARGET.to_string(),
            DUMMY_OTHER_SUBTARGET.to_string(),
        ],
        connection,
    )
    .unwrap();
}

pub fn setup_package_set(connection: &mut SqliteConnection) -> String {
    PackageSet::add(&dummy_packages(), connection).unwrap()
}

/// Seeds release, subtargets and a package set, then submits one pending
/// request for it.
pub fn setup_submitted_request(connection: &mut SqliteConnection) -> BuildRequest {
    setup_release(connection);
    let packages_hash = setup_package_set(connection);
    let request = build_request(&packages_hash);
    NewImageRequest::new(&request).submit(connection).unwrap();
    request
}

pub fn setup_claimed_job(connection: &mut SqliteConnection) -> BuildJob {
    setup_submitted_request(connection);
    ImageRequest::claim(connection)
        .unwrap()
        .expect("Expected a claimable job")
}

pub fn setup_registered_worker(connection: &mut SqliteConnection) -> i32 {
    NewWorker::new("worker-1".to_string(), "10.0.0.2".to_string())
        .register(connection)
        .unwrap()
}

/// Registers a worker able to build the given subtarget, which must have
/// been seeded already.
pub fn setup_skilled_worker(key: &SubtargetKey, connection: &mut SqliteConnection) -> i32 {
    let worker_id = setup_registered_worker(connection);
    let subtarget_id = Subtarget::get_id(key, connection)
        .unwrap()
        .expect("Subtarget is not seeded");
    Worker::add_skill(worker_id, subtarget_id, connection).unwrap();
    worker_id
}
