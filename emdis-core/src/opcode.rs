//! Tabela de opcodes
//!
//! Cada instrução é um único token emoji. A tabela é fechada: um token fora
//! dela nunca é uma instrução.

/// Categorias de instrução
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeCategory {
    /// Forma da pilha (emite código)
    Stack,
    /// Transformações abstratas (não emitem código)
    Arithmetic,
    /// Movimento de dados com operandos inline
    Data,
    /// Controle de fluxo
    Control,
    /// Saída e parada
    System,
}

/// Instruções reconhecidas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    // ═══════════════════════════════════════════════════════════════
    // FORMA DA PILHA
    // ═══════════════════════════════════════════════════════════════

    /// Soma os dois topos
    Add,
    /// Subtrai os dois topos
    Sub,
    /// Desaloca um slot
    PopOut,
    /// Duplica o topo
    Clone,

    // ═══════════════════════════════════════════════════════════════
    // ARITMÉTICA ABSTRATA
    // ═══════════════════════════════════════════════════════════════

    Multiply,
    Divide,
    Modulo,
    Xor,

    // ═══════════════════════════════════════════════════════════════
    // DADOS
    // ═══════════════════════════════════════════════════════════════

    /// Push de registrador
    Push,
    /// Pop para registrador
    Pop,
    /// Carrega imediato em registrador
    Load,

    // ═══════════════════════════════════════════════════════════════
    // CONTROLE DE FLUXO
    // ═══════════════════════════════════════════════════════════════

    /// Bloco executado se o topo for zero
    IfZero,
    /// Bloco executado se o topo não for zero
    IfNotZero,
    /// Jump para label
    JumpTo,
    /// Retorno computado (cursor := pop)
    JumpTop,

    // ═══════════════════════════════════════════════════════════════
    // SISTEMA
    // ═══════════════════════════════════════════════════════════════

    /// Imprime o topo como caractere
    PrintTop,
    /// Halt
    Halt,
}

impl Instruction {
    /// Todas as instruções, na ordem da tabela
    pub const ALL: [Instruction; 17] = [
        Self::Add,
        Self::Sub,
        Self::PopOut,
        Self::Clone,
        Self::Multiply,
        Self::Divide,
        Self::Modulo,
        Self::Xor,
        Self::Push,
        Self::Pop,
        Self::Load,
        Self::IfZero,
        Self::IfNotZero,
        Self::JumpTo,
        Self::JumpTop,
        Self::PrintTop,
        Self::Halt,
    ];

    /// Decodifica instrução a partir do símbolo (já sem seletor de variação)
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "🍡" => Self::Add,
            "🔪" => Self::Sub,
            "📤" => Self::PopOut,
            "🤡" => Self::Clone,
            "⭐" => Self::Multiply,
            "📐" => Self::Divide,
            "📬" => Self::Modulo,
            "🌓" => Self::Xor,
            "📥" => Self::Push,
            "🍿" => Self::Pop,
            "🚛" => Self::Load,
            "😲" => Self::IfZero,
            "😄" => Self::IfNotZero,
            "🏀" => Self::JumpTo,
            "⛰" => Self::JumpTop,
            "🎤" => Self::PrintTop,
            "⌛" => Self::Halt,
            _ => return None,
        })
    }

    /// Símbolo canônico
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "🍡",
            Self::Sub => "🔪",
            Self::PopOut => "📤",
            Self::Clone => "🤡",
            Self::Multiply => "⭐",
            Self::Divide => "📐",
            Self::Modulo => "📬",
            Self::Xor => "🌓",
            Self::Push => "📥",
            Self::Pop => "🍿",
            Self::Load => "🚛",
            Self::IfZero => "😲",
            Self::IfNotZero => "😄",
            Self::JumpTo => "🏀",
            Self::JumpTop => "⛰",
            Self::PrintTop => "🎤",
            Self::Halt => "⌛",
        }
    }

    /// Nome usado em logs e estatísticas
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::PopOut => "pop_out",
            Self::Clone => "clone",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Modulo => "modulo",
            Self::Xor => "xor",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Load => "load",
            Self::IfZero => "if_zero",
            Self::IfNotZero => "if_not_zero",
            Self::JumpTo => "jump_to",
            Self::JumpTop => "jump_top",
            Self::PrintTop => "print_top",
            Self::Halt => "halt",
        }
    }

    /// Retorna categoria
    pub fn category(&self) -> OpcodeCategory {
        match self {
            Self::Add | Self::Sub | Self::PopOut | Self::Clone => OpcodeCategory::Stack,
            Self::Multiply | Self::Divide | Self::Modulo | Self::Xor => OpcodeCategory::Arithmetic,
            Self::Push | Self::Pop | Self::Load => OpcodeCategory::Data,
            Self::IfZero | Self::IfNotZero | Self::JumpTo | Self::JumpTop => {
                OpcodeCategory::Control
            }
            Self::PrintTop | Self::Halt => OpcodeCategory::System,
        }
    }

    /// Efeito na profundidade da pilha do código emitido (em slots de 4 bytes)
    pub fn stack_effect(&self) -> i64 {
        match self {
            Self::Add | Self::Sub | Self::PopOut => -1,
            Self::Clone | Self::Push => 1,
            _ => 0,
        }
    }

    /// Número fixo de linhas emitidas, quando não depende de operandos
    pub fn fixed_line_count(&self) -> Option<usize> {
        match self {
            Self::Add | Self::Sub | Self::Clone => Some(2),
            Self::PopOut | Self::Push | Self::Load => Some(1),
            Self::Multiply | Self::Divide | Self::Modulo | Self::Xor | Self::Pop => Some(0),
            Self::JumpTo | Self::JumpTop | Self::PrintTop => Some(0),
            Self::IfZero | Self::IfNotZero | Self::Halt => None,
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
