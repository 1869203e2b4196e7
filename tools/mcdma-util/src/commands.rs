// SPDX-License-Identifier: MPL-2.0

use std::os::fd::AsRawFd;

use log::info;
use mcdma_bas::{BurstConfig, LaneWidth, configure, error_count, wait_ctrl_deassert};
use mcdma_env::{PioRegion, Result, iommu_group, open_vfio_group};
use safe_open::{FsIdentity, StreamMode};

use crate::cli::{BasArgs, BdfArgs, IommuGroupArgs, MtimeArgs, OpenArgs};

pub fn execute_mtime_command(args: &MtimeArgs) -> Result<()> {
    let mtime = safe_open::mtime(&args.path)?;
    println!("{}", mtime);
    Ok(())
}

pub fn execute_open_command(args: &OpenArgs) -> Result<()> {
    if args.dir {
        let mut dir = safe_open::open_dir(&args.path)?;
        println!("{}", FsIdentity::of_fd(dir.as_raw_fd())?);
        for entry in dir.iter() {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy();
            if name != "." && name != ".." {
                println!("{}", name);
            }
        }
        return Ok(());
    }

    let mode: StreamMode = args.mode.parse()?;
    let file = safe_open::open_stream(&args.path, mode)?;
    println!("{}", FsIdentity::of_fd(file.as_raw_fd())?);
    Ok(())
}

pub fn execute_bdf_command(args: &BdfArgs) -> Result<()> {
    println!("{} (device {})", args.addr, args.addr.vf_prefix());
    Ok(())
}

pub fn execute_iommu_group_command(args: &IommuGroupArgs) -> Result<()> {
    let Some(group) = iommu_group(&args.sysfs, &args.addr)? else {
        println!("none");
        return Ok(());
    };
    println!("{}", group);

    if args.open_vfio {
        let vfio = open_vfio_group(&args.vfio_dir, group)?;
        println!("{}", vfio.path().display());
    }
    Ok(())
}

pub fn execute_bas_command(args: &BasArgs) -> Result<()> {
    let lane = args.lane.map_or_else(LaneWidth::default, LaneWidth::from);
    let config = BurstConfig {
        direction: args.direction.into(),
        lane,
        burst_size: args.burst_size,
        data: args.data,
    };

    let mut bar = PioRegion::map_bar(&args.sysfs, &args.bdf, args.bar)?;
    let ctrl = configure(Some(&mut bar), &config)?;
    println!("ctrl {:#x}", ctrl);

    if args.wait {
        let polls = wait_ctrl_deassert(&mut bar, config.direction, lane, args.max_polls)?;
        info!("transfer done after {} polls", polls);
        let errors = error_count(&mut bar, config.direction, lane)?;
        println!("{}: {} errors", config.direction, errors);
    }
    Ok(())
}
