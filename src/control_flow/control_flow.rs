use std::{collections::HashMap, io::Write};

use tracing::debug;

use crate::{
    binding::{
        bound_tree::{BoundExpression, BoundStatement, Label},
        operators::BoundUnaryOperator,
    },
    lexer::tokens::TokenKind,
    symbols::symbols::TypeSymbol,
    value::Value,
};

pub type BlockId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Start,
    End,
    Body,
}

/// A straight run of statements entered only at the top and left only at
/// the bottom.
#[derive(Debug)]
pub struct BasicBlock<'a> {
    pub kind: BlockKind,
    pub statements: Vec<&'a BoundStatement>,
    pub incoming: Vec<usize>,
    pub outgoing: Vec<usize>,
}

impl<'a> BasicBlock<'a> {
    fn new(kind: BlockKind, statements: Vec<&'a BoundStatement>) -> Self {
        BasicBlock {
            kind,
            statements,
            incoming: vec![],
            outgoing: vec![],
        }
    }

    fn ends_with_return(&self) -> bool {
        matches!(self.statements.last(), Some(BoundStatement::Return(_)))
    }
}

/// A control transfer between two blocks, taken when `condition` holds or
/// always when there is none.
#[derive(Debug)]
pub struct BasicBlockBranch {
    pub from: BlockId,
    pub to: BlockId,
    pub condition: Option<BoundExpression>,
}

#[derive(Debug)]
pub struct ControlFlowGraph<'a> {
    pub blocks: Vec<BasicBlock<'a>>,
    pub branches: Vec<BasicBlockBranch>,
}

impl<'a> ControlFlowGraph<'a> {
    /// Builds the graph of a lowered statement list. The first block is
    /// always `Start` and the last is always `End`; blocks nothing can
    /// reach are dropped.
    pub fn create(statements: &'a [BoundStatement]) -> Self {
        let blocks = partition(statements);
        let mut builder = GraphBuilder::new(blocks);
        builder.connect_blocks();
        builder.remove_unreachable();

        let graph = builder.finish();
        debug!(
            blocks = graph.blocks.len(),
            branches = graph.branches.len(),
            "built control flow graph"
        );
        graph
    }

    pub fn start(&self) -> BlockId {
        0
    }

    pub fn end(&self) -> BlockId {
        self.blocks.len() - 1
    }

    /// True when every way into `End` comes from a block ending in
    /// `return`.
    pub fn all_paths_return(statements: &[BoundStatement]) -> bool {
        let graph = ControlFlowGraph::create(statements);
        let end = &graph.blocks[graph.end()];

        end.incoming
            .iter()
            .all(|branch| graph.blocks[graph.branches[*branch].from].ends_with_return())
    }

    /// Writes the graph in Graphviz `dot` format.
    pub fn write_to(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer, "digraph G {{")?;

        for (id, block) in self.blocks.iter().enumerate() {
            let text = match block.kind {
                BlockKind::Start => String::from("<Start>"),
                BlockKind::End => String::from("<End>"),
                BlockKind::Body => block
                    .statements
                    .iter()
                    .map(|statement| statement.to_string())
                    .collect::<String>(),
            };
            writeln!(writer, "    N{} [label = {}, shape = box]", id, quote(&text))?;
        }

        for branch in &self.branches {
            let label = branch
                .condition
                .as_ref()
                .map(|condition| condition.to_string())
                .unwrap_or_default();
            writeln!(
                writer,
                "    N{} -> N{} [label = {}]",
                branch.from,
                branch.to,
                quote(&label)
            )?;
        }

        writeln!(writer, "}}")
    }
}

fn quote(text: &str) -> String {
    let escaped = text
        .trim_end()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\l");
    format!("\"{}\"", escaped)
}

/// Splits statements into body blocks. A label starts a new block; a jump
/// or return ends the current one.
fn partition(statements: &[BoundStatement]) -> Vec<Vec<&BoundStatement>> {
    let mut blocks = vec![];
    let mut current = vec![];

    for statement in statements {
        match statement {
            BoundStatement::Label(_) => {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
                current.push(statement);
            }
            BoundStatement::Goto(_)
            | BoundStatement::ConditionalGoto { .. }
            | BoundStatement::Return(_) => {
                current.push(statement);
                blocks.push(std::mem::take(&mut current));
            }
            BoundStatement::Expression(_) | BoundStatement::VariableDeclaration { .. } => {
                current.push(statement);
            }
            other => panic!("cannot build a control flow graph over unlowered {:?}", other),
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

struct GraphBuilder<'a> {
    blocks: Vec<BasicBlock<'a>>,
    branches: Vec<BasicBlockBranch>,
    removed_blocks: Vec<bool>,
    removed_branches: Vec<bool>,
}

impl<'a> GraphBuilder<'a> {
    fn new(body: Vec<Vec<&'a BoundStatement>>) -> Self {
        let mut blocks = vec![BasicBlock::new(BlockKind::Start, vec![])];
        blocks.extend(
            body.into_iter()
                .map(|statements| BasicBlock::new(BlockKind::Body, statements)),
        );
        blocks.push(BasicBlock::new(BlockKind::End, vec![]));

        let removed_blocks = vec![false; blocks.len()];

        GraphBuilder {
            blocks,
            branches: vec![],
            removed_blocks,
            removed_branches: vec![],
        }
    }

    fn end(&self) -> BlockId {
        self.blocks.len() - 1
    }

    fn connect_blocks(&mut self) {
        let end = self.end();

        let mut label_blocks: HashMap<Label, BlockId> = HashMap::new();
        for (id, block) in self.blocks.iter().enumerate() {
            for statement in &block.statements {
                if let BoundStatement::Label(label) = statement {
                    label_blocks.insert(label.clone(), id);
                }
            }
        }

        let target = |label: &Label| -> BlockId {
            match label_blocks.get(label) {
                Some(id) => *id,
                None => panic!("jump to undefined label '{}'", label),
            }
        };

        // Start falls into the first body block, or straight to End
        self.connect(0, 1, None);

        for id in 1..end {
            let next = id + 1;
            let last = *self.blocks[id]
                .statements
                .last()
                .expect("body blocks are never empty");

            match last {
                BoundStatement::Goto(label) => self.connect(id, target(label), None),
                BoundStatement::ConditionalGoto {
                    label,
                    condition,
                    jump_if_true,
                } => {
                    let negated = negate(condition);
                    let (jump_condition, fall_condition) = if *jump_if_true {
                        (condition.clone(), negated)
                    } else {
                        (negated, condition.clone())
                    };

                    self.connect(id, target(label), Some(jump_condition));
                    self.connect(id, next, Some(fall_condition));
                }
                BoundStatement::Return(_) => self.connect(id, end, None),
                _ => self.connect(id, next, None),
            }
        }
    }

    /// Adds a branch. A literal `false` condition never fires and a literal
    /// `true` one always does.
    fn connect(&mut self, from: BlockId, to: BlockId, condition: Option<BoundExpression>) {
        let condition = match condition {
            Some(BoundExpression::Literal(Value::Bool(true))) => None,
            Some(BoundExpression::Literal(Value::Bool(false))) => return,
            other => other,
        };

        let branch = self.branches.len();
        self.branches.push(BasicBlockBranch {
            from,
            to,
            condition,
        });
        self.removed_branches.push(false);
        self.blocks[from].outgoing.push(branch);
        self.blocks[to].incoming.push(branch);
    }

    fn has_live_incoming(&self, id: BlockId) -> bool {
        self.blocks[id]
            .incoming
            .iter()
            .any(|branch| !self.removed_branches[*branch])
    }

    /// Drops body blocks without a live incoming branch, together with
    /// their outgoing branches, until nothing changes.
    fn remove_unreachable(&mut self) {
        let end = self.end();

        loop {
            let unreachable = (1..end)
                .find(|id| !self.removed_blocks[*id] && !self.has_live_incoming(*id));

            match unreachable {
                Some(id) => {
                    self.removed_blocks[id] = true;
                    for branch in &self.blocks[id].outgoing {
                        self.removed_branches[*branch] = true;
                    }
                }
                None => break,
            }
        }
    }

    /// Renumbers the surviving blocks and branches.
    fn finish(self) -> ControlFlowGraph<'a> {
        let mut block_ids = vec![usize::MAX; self.blocks.len()];
        let mut blocks = vec![];

        for (id, block) in self.blocks.into_iter().enumerate() {
            if !self.removed_blocks[id] {
                block_ids[id] = blocks.len();
                blocks.push(BasicBlock::new(block.kind, block.statements));
            }
        }

        let mut branches = vec![];
        for (id, branch) in self.branches.into_iter().enumerate() {
            if self.removed_branches[id] {
                continue;
            }

            let new_id = branches.len();
            let (from, to) = (block_ids[branch.from], block_ids[branch.to]);
            blocks[from].outgoing.push(new_id);
            blocks[to].incoming.push(new_id);
            branches.push(BasicBlockBranch {
                from,
                to,
                condition: branch.condition,
            });
        }

        ControlFlowGraph { blocks, branches }
    }
}

fn negate(condition: &BoundExpression) -> BoundExpression {
    if let BoundExpression::Literal(Value::Bool(value)) = condition {
        return BoundExpression::Literal(Value::Bool(!value));
    }

    let operator = BoundUnaryOperator::bind(TokenKind::Not, TypeSymbol::Bool)
        .expect("!bool is always defined");

    BoundExpression::Unary {
        operator,
        operand: Box::new(condition.clone()),
    }
}
