use bitgraph::areas::repository::Repository;
use bitgraph::artifacts::log::rev_list::{RevList, WalkOptions};
use bitgraph::artifacts::objects::object_id::ObjectId;
use bitgraph::{Error, build_graph, parse_commit, read_object, resolve_ref, walk};
use common::repo::{TestRepo, test_repo};
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

const T0: i64 = 1623654400;
const T1: i64 = 1623654600;

fn ids(commits: &[bitgraph::artifacts::objects::commit::Commit]) -> Vec<String> {
    commits.iter().map(|c| c.oid().to_string()).collect()
}

#[rstest]
fn single_root_commit_yields_one_node(
    test_repo: TestRepo,
) -> Result<(), Box<dyn std::error::Error>> {
    let oids = test_repo.linear_history(&[T0]);

    let start = resolve_ref(None, test_repo.path())?;
    let commits = walk(test_repo.path(), &start, T0)?;
    let graph = build_graph(&commits);

    assert_eq!(ids(&commits), oids);
    assert!(commits[0].is_root());
    assert_eq!(commits[0].committer_timestamp(), T0);
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);

    Ok(())
}

#[rstest]
fn two_commits_inside_window(test_repo: TestRepo) -> Result<(), Box<dyn std::error::Error>> {
    let oids = test_repo.linear_history(&[T0, T1]);
    let (first, second) = (&oids[0], &oids[1]);

    let start = resolve_ref(Some("main"), test_repo.path())?;
    let commits = walk(test_repo.path(), &start, T0)?;
    let graph = build_graph(&commits);

    assert_eq!(ids(&commits), vec![second.clone(), first.clone()]);
    let edges = graph
        .edges()
        .map(|edge| (edge.from.to_string(), edge.to.to_string()))
        .collect::<Vec<_>>();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(edges, vec![(second.clone(), first.clone())]);

    Ok(())
}

#[rstest]
fn later_threshold_still_walks_full_ancestry(
    test_repo: TestRepo,
) -> Result<(), Box<dyn std::error::Error>> {
    let oids = test_repo.linear_history(&[T0, T1]);
    let repository = Repository::open(test_repo.path(), Box::new(std::io::sink()))?;
    let start = repository.refs().resolve(None)?;

    let history = RevList::new(&repository, start, WalkOptions::since(1623654500)).walk()?;

    assert_eq!(history.traversed, 2);
    assert_eq!(ids(&history.commits), vec![oids[1].clone()]);

    Ok(())
}

#[rstest]
fn real_object_ids_pass_verification(
    test_repo: TestRepo,
) -> Result<(), Box<dyn std::error::Error>> {
    let oids = test_repo.linear_history(&[T0, T0 + 10, T0 + 20]);
    let repository = Repository::open(test_repo.path(), Box::new(std::io::sink()))?;
    let options = WalkOptions {
        verify_hashes: true,
        ..WalkOptions::since(0)
    };

    let start = ObjectId::try_parse(oids[2].as_str())?;
    let history = RevList::new(&repository, start, options).walk()?;

    assert_eq!(history.commits.len(), 3);

    Ok(())
}

#[rstest]
fn tampered_parent_ends_verified_walk(
    test_repo: TestRepo,
) -> Result<(), Box<dyn std::error::Error>> {
    let oids = test_repo.linear_history(&[T0, T1]);
    // same id, different content
    let forged = format!("commit 52\0committer Mallory <m@example.com> {T0} +0000\n");
    test_repo.write_raw_object(&oids[0], forged.as_bytes());
    let repository = Repository::open(test_repo.path(), Box::new(std::io::sink()))?;
    let start = ObjectId::try_parse(oids[1].as_str())?;

    let verified = RevList::new(
        &repository,
        start.clone(),
        WalkOptions {
            verify_hashes: true,
            ..WalkOptions::since(0)
        },
    )
    .walk()?;
    let trusted = RevList::new(&repository, start, WalkOptions::since(0)).walk()?;

    assert_eq!(ids(&verified.commits), vec![oids[1].clone()]);
    assert_eq!(trusted.commits.len(), 2);

    Ok(())
}

#[rstest]
fn read_object_returns_inflated_payload(
    test_repo: TestRepo,
) -> Result<(), Box<dyn std::error::Error>> {
    let oid = test_repo.commit(&[], T0, "Initial commit");

    let payload = read_object(test_repo.path(), &oid)?;
    let commit = parse_commit(&payload, &ObjectId::try_parse(oid.as_str())?)?;

    assert!(payload.starts_with(b"commit "));
    assert_eq!(commit.committer_timestamp(), T0);
    assert_eq!(commit, parse_commit(&payload, commit.oid())?);

    Ok(())
}

#[rstest]
fn read_object_reports_missing_and_corrupt_objects(test_repo: TestRepo) {
    let missing = "0123456789abcdef0123456789abcdef01234567";
    let corrupt = "89abcdef0123456789abcdef0123456789abcdef";
    std::fs::create_dir_all(test_repo.object_path(corrupt).parent().unwrap()).unwrap();
    std::fs::write(test_repo.object_path(corrupt), b"not zlib at all").unwrap();

    assert!(matches!(
        read_object(test_repo.path(), missing),
        Err(Error::ObjectNotFound { .. })
    ));
    assert!(matches!(
        read_object(test_repo.path(), corrupt),
        Err(Error::CorruptObject { .. })
    ));
    assert!(matches!(
        read_object(test_repo.path(), "abc123"),
        Err(Error::InvalidObjectId(_))
    ));
}

#[rstest]
fn tags_and_packed_refs_resolve(test_repo: TestRepo) -> Result<(), Box<dyn std::error::Error>> {
    let oids = test_repo.linear_history(&[T0, T1]);
    test_repo.set_ref("refs/tags/v1.0", &oids[0]);
    std::fs::write(
        test_repo.git_dir().join("packed-refs"),
        format!(
            "# pack-refs with: peeled fully-peeled sorted\n{} refs/heads/release\n",
            oids[0]
        ),
    )?;

    assert_eq!(resolve_ref(Some("v1.0"), test_repo.path())?.as_ref(), oids[0]);
    assert_eq!(resolve_ref(Some("release"), test_repo.path())?.as_ref(), oids[0]);
    assert_eq!(resolve_ref(Some("HEAD"), test_repo.path())?.as_ref(), oids[1]);

    Ok(())
}

#[rstest]
fn merge_history_follows_first_parent(
    test_repo: TestRepo,
) -> Result<(), Box<dyn std::error::Error>> {
    let base = test_repo.commit(&[], T0, "base");
    let left = test_repo.commit(&[&base], T0 + 10, "left");
    let right = test_repo.commit(&[&base], T0 + 20, "right");
    let merge = test_repo.commit(&[&left, &right], T0 + 30, "merge");
    test_repo.set_ref("refs/heads/main", &merge);

    let start = resolve_ref(None, test_repo.path())?;
    let commits = walk(test_repo.path(), &start, 0)?;

    assert_eq!(ids(&commits), vec![merge, left, base]);
    assert_eq!(commits[0].merge_parents()[0].as_ref(), right);

    Ok(())
}

#[rstest]
fn short_parent_id_is_end_of_history(
    test_repo: TestRepo,
) -> Result<(), Box<dyn std::error::Error>> {
    let tip = test_repo.commit(&["abc123"], T1, "Grafted tip");
    test_repo.set_ref("refs/heads/main", &tip);

    let start = resolve_ref(None, test_repo.path())?;
    let commits = walk(test_repo.path(), &start, 0)?;

    assert_eq!(ids(&commits), vec![tip]);
    assert_eq!(commits[0].parent(), None);
    assert_eq!(commits[0].unresolved_parent(), Some("abc123"));
    assert_eq!(build_graph(&commits).edge_count(), 0);

    Ok(())
}

#[rstest]
fn unresolvable_reference_is_an_error(test_repo: TestRepo) {
    test_repo.linear_history(&[T0]);
    test_repo.set_ref("refs/heads/loop", "ref: refs/heads/loop");

    assert!(matches!(
        resolve_ref(Some("feature"), test_repo.path()),
        Err(Error::RefNotFound { .. })
    ));
    assert!(matches!(
        resolve_ref(Some("loop"), test_repo.path()),
        Err(Error::RefCycle { .. })
    ));
}

#[rstest]
fn non_repository_is_rejected() {
    let dir = assert_fs::TempDir::new().unwrap();

    assert!(matches!(
        resolve_ref(None, dir.path()),
        Err(Error::RepositoryNotFound { .. })
    ));
}
