use std::{num::NonZeroUsize, sync::Arc};

use tokio::{sync::Semaphore, task::JoinSet};

use super::{error::*, runner::*, testcase::*, verdict::JudgeOutcome};

#[derive(Debug)]
pub struct JudgedTestcase {
    pub testcase: FsTestcase,
    pub result: Result<JudgeOutcome>,
}

impl JudgedTestcase {
    pub fn name(&self) -> &str {
        self.testcase.name()
    }
}

/// Single-pass sequence of judged testcases of one problem.
///
/// The directory is enumerated once in [`BatchJudge::new`]; build a new
/// `BatchJudge` to judge the testcases again.
#[derive(Debug)]
pub struct BatchJudge<'r> {
    runner: &'r JudgeRunner,
    limits: JudgeLimits,
    pending: std::vec::IntoIter<FsTestcase>,
}

impl<'r> BatchJudge<'r> {
    pub fn new(runner: &'r JudgeRunner, layout: &TestcaseLayout, limits: JudgeLimits) -> Result<Self> {
        let testcases = layout.enumerate()?;
        Ok(Self::from_testcases(runner, testcases, limits))
    }

    pub fn from_testcases(
        runner: &'r JudgeRunner,
        testcases: Vec<FsTestcase>,
        limits: JudgeLimits,
    ) -> Self {
        Self {
            runner,
            limits,
            pending: testcases.into_iter(),
        }
    }

    /// Testcases not judged yet, in judging order.
    pub fn remaining(&self) -> &[FsTestcase] {
        self.pending.as_slice()
    }

    /// Judge the next testcase.
    ///
    /// A spawn failure is yielded once and ends the sequence, since no
    /// remaining testcase could be judged either.
    pub async fn next(&mut self) -> Option<JudgedTestcase> {
        let testcase = self.pending.next()?;
        let result = judge_one(self.runner, &testcase, &self.limits).await;
        if matches!(&result, Err(e) if e.is_fatal_for_batch()) {
            self.pending = Vec::new().into_iter();
        }
        Some(JudgedTestcase { testcase, result })
    }

    /// Judge all remaining testcases with up to `jobs` processes at a time.
    ///
    /// Each testcase still gets its own process and timers. Results are in
    /// enumeration order regardless of completion order. A spawn failure
    /// aborts the whole batch.
    pub async fn judge_all(mut self, jobs: NonZeroUsize) -> Result<Vec<JudgedTestcase>> {
        let mut results = Vec::with_capacity(self.pending.len());

        if jobs.get() == 1 {
            while let Some(judged) = self.next().await {
                if let Err(e) = &judged.result {
                    if e.is_fatal_for_batch() {
                        return judged.result.map(|_| Vec::new());
                    }
                }
                results.push(judged);
            }
            return Ok(results);
        }

        let semaphore = Arc::new(Semaphore::new(jobs.get()));
        let mut tasks = JoinSet::new();
        for (idx, testcase) in self.pending.by_ref().enumerate() {
            let runner = self.runner.clone();
            let limits = self.limits;
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let result = judge_one(&runner, &testcase, &limits).await;
                (idx, JudgedTestcase { testcase, result })
            });
        }

        let mut indexed = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let (idx, judged) = match joined {
                Ok(x) => x,
                Err(e) if e.is_cancelled() => continue,
                Err(e) => std::panic::resume_unwind(e.into_panic()),
            };
            if let Err(e) = &judged.result {
                if e.is_fatal_for_batch() {
                    tasks.abort_all();
                    while tasks.join_next().await.is_some() {}
                    return judged.result.map(|_| Vec::new());
                }
            }
            indexed.push((idx, judged));
        }
        indexed.sort_by_key(|(idx, _)| *idx);
        results.extend(indexed.into_iter().map(|(_, judged)| judged));
        Ok(results)
    }
}

async fn judge_one(
    runner: &JudgeRunner,
    testcase: &FsTestcase,
    limits: &JudgeLimits,
) -> Result<JudgeOutcome> {
    if !testcase.expected_path().is_file() {
        return Err(JudgeError::MissingCounterpart {
            name: testcase.name().to_owned(),
            path: testcase.expected_path().to_owned(),
        });
    }
    log::debug!("Judging testcase {}", testcase.name());
    runner
        .run(testcase.input_path(), testcase.expected_path(), limits)
        .await
}
