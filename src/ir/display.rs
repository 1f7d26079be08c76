//! Human-readable IR printing
//!
//! One line per statement, `$id = kind(args)`, with offloaded bodies
//! indented under their task header. Meant for `--emit-ir` style debugging
//! and test failure output, not for parsing back.

use std::fmt;

use super::{Block, OffloadedTask, Stmt, StmtKind};

fn fmt_ids(f: &mut fmt::Formatter<'_>, ids: &[super::StmtId]) -> fmt::Result {
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "${}", id)?;
    }
    Ok(())
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.ret_type.is_void() {
            write!(f, "${} : {} = ", self.id, self.ret_type)?;
        } else {
            write!(f, "${} = ", self.id)?;
        }
        match &self.kind {
            StmtKind::GetRoot => write!(f, "get_root()"),
            StmtKind::SNodeLookup(op) => {
                write!(
                    f,
                    "snode_lookup({}, node=${}, index=${}",
                    op.snode, op.input_snode, op.input_index
                )?;
                if !op.global_indices.is_empty() {
                    f.write_str(", global=[")?;
                    fmt_ids(f, &op.global_indices)?;
                    f.write_str("]")?;
                }
                if op.activate {
                    f.write_str(", activate")?;
                }
                f.write_str(")")
            }
            StmtKind::GetChild(op) => write!(
                f,
                "get_child(${}, {} -> {}, chid={})",
                op.input_ptr, op.input_snode, op.output_snode, op.chid
            ),
            StmtKind::Linearize(op) => {
                f.write_str("linearize([")?;
                fmt_ids(f, &op.inputs)?;
                write!(f, "], strides={:?})", op.strides)
            }
            StmtKind::OffsetAndExtractBits(op) => {
                write!(
                    f,
                    "bit_extract(${} + {}, bits={}..{})",
                    op.input, op.offset, op.bit_begin, op.bit_end
                )?;
                if op.simplified {
                    f.write_str(" [simplified]")?;
                }
                Ok(())
            }
            StmtKind::IntegerOffset(op) => {
                write!(f, "integer_offset(${} + {})", op.input, op.offset)
            }
            StmtKind::ElementShuffle(op) => {
                f.write_str("shuffle([")?;
                for (i, e) in op.elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "${}[{}]", e.stmt, e.index)?;
                }
                f.write_str("]")?;
                if op.pointer {
                    f.write_str(", pointer")?;
                }
                f.write_str(")")
            }
            StmtKind::Offloaded(task) => write!(f, "{}", task),
            StmtKind::StackAlloca(op) => {
                write!(f, "stack_alloca({}, max_size={})", op.dt, op.max_size)
            }
            StmtKind::StackPush(op) => write!(f, "stack_push(${}, ${})", op.stack, op.v),
            StmtKind::StackPop(op) => write!(f, "stack_pop(${})", op.stack),
            StmtKind::StackLoadTop(op) => write!(f, "stack_load_top(${})", op.stack),
            StmtKind::StackLoadTopAdjoint(op) => {
                write!(f, "stack_load_top_adjoint(${})", op.stack)
            }
            StmtKind::StackAccAdjoint(op) => {
                write!(f, "stack_acc_adjoint(${}, ${})", op.stack, op.v)
            }
            StmtKind::LoopIndex(op) => write!(
                f,
                "loop_index({}{})",
                op.index,
                if op.is_struct_for { ", struct_for" } else { "" }
            ),
            StmtKind::GlobalTemporary(op) => write!(f, "global_tmp(offset={})", op.offset),
            StmtKind::InternalFuncCall(op) => write!(f, "call \"{}\"", op.func_name),
            StmtKind::PragmaSlp(op) => write!(f, "pragma_slp(width={})", op.slp_width),
            StmtKind::Const(value) => write!(f, "const {}", value),
        }
    }
}

impl fmt::Display for OffloadedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offload {} on {}", self.kind, self.device)?;
        if let Some(snode) = self.snode {
            write!(f, " {}", snode)?;
        }
        if self.kind == super::TaskKind::RangeFor {
            let begin: &dyn fmt::Display = if self.const_begin {
                &self.begin_value
            } else {
                &self.begin_offset
            };
            let end: &dyn fmt::Display = if self.const_end {
                &self.end_value
            } else {
                &self.end_offset
            };
            write!(
                f,
                " range [{}{}, {}{})",
                if self.const_begin { "" } else { "tmp@" },
                begin,
                if self.const_end { "" } else { "tmp@" },
                end
            )?;
            if self.reversed {
                f.write_str(" reversed")?;
            }
        }
        if self.block_dim != 0 {
            write!(f, " block_dim={}", self.block_dim)?;
        }
        if let Some(body) = &self.body {
            f.write_str(" {\n")?;
            for stmt in &body.stmts {
                // nested bodies are re-indented one level only; offload
                // inside offload does not occur after partitioning
                for line in stmt.to_string().lines() {
                    writeln!(f, "  {}", line)?;
                }
            }
            f.write_str("}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.stmts {
            writeln!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Arch, IrBuilder};
    use crate::types::DataType;

    #[test]
    fn test_stmt_one_liners() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let i = b.const_int(3, DataType::I32).unwrap();
        let j = b.const_int(5, DataType::I32).unwrap();
        b.linearize(vec![i, j], vec![8, 1]).unwrap();
        let block = b.end_block().unwrap();

        let text = block.to_string();
        assert!(text.contains("const 3"));
        assert!(text.contains("linearize([$0, $1], strides=[8, 1])"));
    }

    #[test]
    fn test_offloaded_header_and_body() {
        let mut b = IrBuilder::new();
        b.begin_block();
        b.range_for_task(Arch::Cuda, 0, 64, |b| {
            b.loop_index(0, false)?;
            Ok(())
        })
        .unwrap();
        let block = b.end_block().unwrap();

        let text = block.to_string();
        assert!(text.contains("offload range_for on cuda range [0, 64)"));
        assert!(text.contains("  $0 : i32 = loop_index(0)"));
    }
}
