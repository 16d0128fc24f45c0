//! Generates the classic four-job diamond workflow as a DAX document:
//! one preprocess job fanning out to two findrange jobs, fanning back
//! into one analyze job.
//!
//! Usage: diamond DAXFILE

use std::env;
use std::fs;
use std::process;

use anyhow::Context;

use daxgen::{Adag, File, FileUse, Job, Link};

fn main() -> anyhow::Result<()> {
    let Some(daxfile) = env::args().nth(1) else {
        eprintln!("Usage: diamond DAXFILE");
        process::exit(1);
    };

    let mut diamond = Adag::new("diamond");

    let a = File::new("f.a");
    let b1 = File::new("f.b1");
    let b2 = File::new("f.b2");
    let c1 = File::new("f.c1");
    let c2 = File::new("f.c2");
    let d = File::new("f.d");

    let preprocess = diamond.add_job(
        Job::new("preprocess")
            .arg("-i")
            .file_arg(&a)
            .arg("-o")
            .file_arg(&b1)
            .arg("-o")
            .file_arg(&b2)
            .uses(&a, Link::Input)
            .uses_with(FileUse::new(&b1, Link::Output).transfer(false).register(false))
            .uses_with(FileUse::new(&b2, Link::Output).transfer(false).register(false)),
    )?;

    let findrange_left = diamond.add_job(
        Job::new("findrange")
            .arg("-i")
            .file_arg(&b1)
            .arg("-o")
            .file_arg(&c1)
            .uses(&b1, Link::Input)
            .uses_with(FileUse::new(&c1, Link::Output).transfer(false).register(false)),
    )?;

    let findrange_right = diamond.add_job(
        Job::new("findrange")
            .arg("-i")
            .file_arg(&b2)
            .arg("-o")
            .file_arg(&c2)
            .uses(&b2, Link::Input)
            .uses_with(FileUse::new(&c2, Link::Output).transfer(false).register(false)),
    )?;

    let analyze = diamond.add_job(
        Job::new("analyze")
            .arg("-i")
            .file_arg(&c1)
            .arg("-i")
            .file_arg(&c2)
            .arg("-o")
            .file_arg(&d)
            .uses(&c1, Link::Input)
            .uses(&c2, Link::Input)
            .uses_with(FileUse::new(&d, Link::Output).transfer(true).register(false)),
    )?;

    diamond.add_dependency(&preprocess, &findrange_left)?;
    diamond.add_dependency(&preprocess, &findrange_right)?;
    diamond.add_dependency(&findrange_left, &analyze)?;
    diamond.add_dependency(&findrange_right, &analyze)?;

    diamond.validate()?;

    let mut out = fs::File::create(&daxfile).with_context(|| format!("creating {daxfile}"))?;
    diamond.write_xml(&mut out)?;
    println!("Wrote {daxfile}");
    Ok(())
}
