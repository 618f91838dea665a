use std::{path::Path, thread};

use crossbeam_channel::{bounded, Receiver, Sender};
use utils::{error::report, setup_output_dir};

use crate::{
    config::Config,
    counts::{extract, output_counts},
    input::InputFile,
};

/// Outcome of processing one input file: the number of targets written
type FileResult = anyhow::Result<usize>;

/// Extract counts from one input file and write them to the output directory
pub fn process_file(cfg: &Config, f: &InputFile, out_dir: &Path) -> FileResult {
    let table = extract(f.path(), cfg)?;
    let opath = out_dir.join(f.output_name());
    output_counts(&table, &opath)?;
    Ok(table.len())
}

fn process_task(
    cfg: &Config,
    ix: usize,
    out_dir: &Path,
    recv: Receiver<usize>,
    snd: Sender<(usize, FileResult)>,
) -> anyhow::Result<()> {
    debug!("Process task {} starting up", ix);
    while let Ok(i) = recv.recv() {
        let f = &cfg.input_files()[i];
        trace!("Task {} processing {}", ix, f.path().display());
        let res = process_file(cfg, f, out_dir)
            .map_err(|e| e.context(format!("Error processing file {}", f.path().display())));
        snd.send((i, res))?;
    }
    debug!("Process task {} closing down", ix);
    Ok(())
}

/// Process all input files
///
/// Files are handed out to a pool of worker threads.  Each file is handled
/// independently; a failure is reported and the remaining files are still
/// processed.  Results are reported in input file order once all files are done
pub fn process_files(cfg: &Config) -> anyhow::Result<()> {
    let out_dir = setup_output_dir(Some(cfg.output_dir()))?;
    let files = cfg.input_files();
    if files.is_empty() {
        warn!("No input files found");
        return Ok(());
    }

    let nt = cfg.threads().min(files.len());
    info!("Extracting counts from {} files using {} threads", files.len(), nt);

    // All jobs are queued up front so the channels never block
    let (send_job, recv_job) = bounded(files.len());
    let (send_res, recv_res) = bounded(files.len());
    for i in 0..files.len() {
        send_job.send(i)?;
    }
    drop(send_job);

    let mut results: Vec<Option<FileResult>> = (0..files.len()).map(|_| None).collect();

    thread::scope(|sc| {
        let handles: Vec<_> = (0..nt)
            .map(|ix| {
                let r = recv_job.clone();
                let s = send_res.clone();
                let od = out_dir.as_path();
                sc.spawn(move || process_task(cfg, ix + 1, od, r, s))
            })
            .collect();
        drop(send_res);

        for (i, res) in recv_res.iter() {
            results[i] = Some(res)
        }

        for h in handles {
            match h.join() {
                Ok(Err(e)) => error!("Worker task failed: {:#}", e),
                Err(_) => error!("Worker task panicked"),
                _ => (),
            }
        }
    });

    let mut n_ok = 0;
    for (f, res) in files.iter().zip(results) {
        match res {
            Some(Ok(n)) => {
                n_ok += 1;
                info!(
                    "Wrote {} targets from {} to {}",
                    n,
                    f.path().display(),
                    out_dir.join(f.output_name()).display()
                )
            }
            Some(Err(e)) => report(&e),
            None => error!("No result returned for {}", f.path().display()),
        }
    }
    info!(
        "Finished: {} of {} files processed successfully",
        n_ok,
        files.len()
    );
    Ok(())
}
